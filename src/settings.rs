//! Persistent settings: a JSON file, overridden by `AZURE_*` environment
//! variables, overridden in turn by command-line flags.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use azrm_azure::types::{AzureConfig, AzureCredentials};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

pub const ENV_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const ENV_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub credentials: AzureCredentials,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_resource_group: Option<String>,
    pub output: OutputFormat,
    /// Endpoint, API version, timeout and retry overrides.
    pub azure: AzureConfig,
}

/// `<config dir>/azrm/config.json`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("azrm").join("config.json"))
}

impl Settings {
    /// Load settings from `explicit`, which must exist, or from the default
    /// location, which may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("no settings file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("loading settings from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply the `AZURE_*` environment variables that are set and non-empty.
    pub fn with_env(mut self) -> Self {
        let creds = &mut self.credentials;
        for (name, field) in [
            (ENV_TENANT_ID, &mut creds.tenant_id),
            (ENV_CLIENT_ID, &mut creds.client_id),
            (ENV_CLIENT_SECRET, &mut creds.client_secret),
            (ENV_SUBSCRIPTION_ID, &mut creds.subscription_id),
        ] {
            if let Some(value) = env::var(name).ok().filter(|v| !v.is_empty()) {
                debug!("{} taken from environment", name);
                *field = value;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for name in [ENV_TENANT_ID, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_SUBSCRIPTION_ID] {
            env::remove_var(name);
        }
    }

    fn write_settings(json: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    #[test]
    fn file_with_partial_fields_keeps_defaults() {
        let f = write_settings(
            r#"{
                "credentials": {"tenantId": "T1", "clientId": "c1"},
                "defaultResourceGroup": "rg-net",
                "output": "yaml",
                "azure": {"timeoutSecs": 10}
            }"#,
        );
        let s = Settings::from_file(f.path()).unwrap();
        assert_eq!(s.credentials.tenant_id, "T1");
        assert_eq!(s.default_resource_group.as_deref(), Some("rg-net"));
        assert_eq!(s.output, OutputFormat::Yaml);
        assert_eq!(s.azure.timeout_secs, 10);
        assert_eq!(s.azure.management_endpoint, AzureConfig::new().management_endpoint);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let f = write_settings("{ not json");
        let err = Settings::from_file(f.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("Invalid settings file"));
    }

    #[test]
    #[serial]
    fn environment_overrides_file() {
        clear_env();
        env::set_var(ENV_TENANT_ID, "T-env");
        env::set_var(ENV_SUBSCRIPTION_ID, "S-env");
        env::set_var(ENV_CLIENT_ID, "");

        let f = write_settings(r#"{"credentials": {"tenantId": "T-file", "clientId": "c-file"}}"#);
        let s = Settings::from_file(f.path()).unwrap().with_env();
        assert_eq!(s.credentials.tenant_id, "T-env");
        assert_eq!(s.credentials.subscription_id, "S-env");
        assert_eq!(s.credentials.client_id, "c-file");
        clear_env();
    }

    #[test]
    #[serial]
    fn defaults_without_environment() {
        clear_env();
        let s = Settings::default().with_env();
        assert!(s.credentials.tenant_id.is_empty());
        assert_eq!(s.output, OutputFormat::Json);
    }
}
