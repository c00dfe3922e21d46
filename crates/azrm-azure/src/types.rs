//! Core types shared by the transport, the resource clients and the commands.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Transport error types ───────────────────────────────────────────

/// Categorised error kinds for calls against the management plane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AzureErrorKind {
    Auth,
    NotFound,
    Conflict,
    Forbidden,
    RateLimit,
    BadRequest,
    ServerError,
    Timeout,
    Network,
    Parse,
    Validation,
    NotAuthenticated,
    SubscriptionNotSet,
}

impl fmt::Display for AzureErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth => write!(f, "Authentication error"),
            Self::NotFound => write!(f, "Resource not found"),
            Self::Conflict => write!(f, "Resource conflict"),
            Self::Forbidden => write!(f, "Forbidden"),
            Self::RateLimit => write!(f, "Rate limit exceeded"),
            Self::BadRequest => write!(f, "Bad request"),
            Self::ServerError => write!(f, "Server error"),
            Self::Timeout => write!(f, "Request timeout"),
            Self::Network => write!(f, "Network error"),
            Self::Parse => write!(f, "Parse error"),
            Self::Validation => write!(f, "Validation error"),
            Self::NotAuthenticated => write!(f, "Not authenticated"),
            Self::SubscriptionNotSet => write!(f, "Subscription ID not set"),
        }
    }
}

/// Error returned by the HTTP transport and the ARM-backed resource clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureError {
    pub kind: AzureErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl AzureError {
    pub fn new(kind: AzureErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(kind: AzureErrorKind, message: impl Into<String>, status: u16) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: Some(status),
        }
    }

    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            400 => AzureErrorKind::BadRequest,
            401 => AzureErrorKind::Auth,
            403 => AzureErrorKind::Forbidden,
            404 => AzureErrorKind::NotFound,
            408 => AzureErrorKind::Timeout,
            409 => AzureErrorKind::Conflict,
            429 => AzureErrorKind::RateLimit,
            500..=599 => AzureErrorKind::ServerError,
            _ => AzureErrorKind::Network,
        };
        Self::with_status(kind, extract_arm_message(body), status)
    }

    pub fn not_authenticated() -> Self {
        Self::new(
            AzureErrorKind::NotAuthenticated,
            "No access token; authenticate before issuing management calls",
        )
    }

    pub fn subscription_not_set() -> Self {
        Self::new(AzureErrorKind::SubscriptionNotSet, "Subscription ID not configured")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(AzureErrorKind::Validation, message)
    }

    /// Whether the remote side rejected our credentials or token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.kind,
            AzureErrorKind::Auth | AzureErrorKind::NotAuthenticated
        )
    }
}

impl fmt::Display for AzureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "[{}] ({}) {}", self.kind, code, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for AzureError {}

pub type AzureResult<T> = Result<T, AzureError>;

/// Pull `error.code: error.message` out of a standard ARM error body, falling
/// back to the raw body when it is not one.
fn extract_arm_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: Option<ErrorBody>,
    }
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        code: String,
        #[serde(default)]
        message: String,
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(Envelope { error: Some(e) }) if !e.code.is_empty() => {
            format!("{}: {}", e.code, e.message)
        }
        Ok(Envelope { error: Some(e) }) => e.message,
        _ => body.to_string(),
    }
}

// ─── Command error taxonomy ──────────────────────────────────────────

/// Errors surfaced by the command layer to the invoking environment.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{kind} '{name}' was not found in {scope}")]
    NotFound {
        kind: &'static str,
        name: String,
        scope: String,
    },

    #[error("{kind} with the name '{name}' already exists in '{parent}'")]
    DuplicateName {
        kind: &'static str,
        name: String,
        parent: String,
    },

    #[error("Authentication failed for tenant '{tenant}': {source}")]
    AuthenticationFailed {
        tenant: String,
        #[source]
        source: AzureError,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Remote call failed: {0}")]
    RemoteCallFailed(#[from] AzureError),
}

pub type CommandResult<T> = Result<T, CommandError>;

// ─── OAuth / Auth ────────────────────────────────────────────────────

/// Client credentials for Azure AD (service principal).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AzureCredentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub subscription_id: String,
}

impl AzureCredentials {
    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty() && !self.tenant_id.is_empty()
    }
}

/// Bearer token held for the lifetime of one invocation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AzureToken {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Tenant the token was issued for.
    #[serde(default)]
    pub tenant_id: Option<String>,
}

impl AzureToken {
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(exp) => Utc::now() >= exp,
            None => false,
        }
    }
}

/// Raw token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// ─── ARM list envelope ──────────────────────────────────────────────

/// Generic ARM list wrapper (`value` array with optional `nextLink`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ArmList<T> {
    #[serde(default)]
    pub value: Vec<T>,
    #[serde(default)]
    pub next_link: Option<String>,
}

// ─── Configuration ──────────────────────────────────────────────────

pub const ARM_BASE: &str = "https://management.azure.com";
pub const LOGIN_BASE: &str = "https://login.microsoftonline.com";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureConfig {
    /// Management-plane endpoint, without a trailing slash.
    pub management_endpoint: String,
    /// Azure AD authority host, without a trailing slash.
    pub login_endpoint: String,
    pub api_version_network: String,
    pub api_version_subscriptions: String,
    pub api_version_recovery_services: String,
    pub timeout_secs: u64,
    /// Transport-level retries for throttling and 5xx responses.
    pub max_retries: u32,
}

impl AzureConfig {
    pub fn new() -> Self {
        Self {
            management_endpoint: ARM_BASE.into(),
            login_endpoint: LOGIN_BASE.into(),
            api_version_network: api_versions::NETWORK.into(),
            api_version_subscriptions: api_versions::SUBSCRIPTIONS.into(),
            api_version_recovery_services: api_versions::RECOVERY_SERVICES.into(),
            timeout_secs: 30,
            max_retries: 0,
        }
    }

    /// Scope requested for management-plane tokens.
    pub fn management_scope(&self) -> String {
        format!("{}/.default", self.management_endpoint.trim_end_matches('/'))
    }
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub mod api_versions {
    pub const NETWORK: &str = "2024-01-01";
    pub const SUBSCRIPTIONS: &str = "2022-12-01";
    pub const RECOVERY_SERVICES: &str = "2023-04-01";
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_from_status() {
        assert_eq!(AzureError::from_status(401, "").kind, AzureErrorKind::Auth);
        assert_eq!(AzureError::from_status(404, "").kind, AzureErrorKind::NotFound);
        assert_eq!(AzureError::from_status(409, "").kind, AzureErrorKind::Conflict);
        assert_eq!(AzureError::from_status(429, "").kind, AzureErrorKind::RateLimit);
        assert_eq!(AzureError::from_status(503, "").kind, AzureErrorKind::ServerError);
        assert_eq!(AzureError::from_status(302, "").kind, AzureErrorKind::Network);
    }

    #[test]
    fn arm_error_body_is_unwrapped() {
        let body = r#"{"error":{"code":"ResourceNotFound","message":"The Resource 'vnet1' was not found."}}"#;
        let e = AzureError::from_status(404, body);
        assert_eq!(e.message, "ResourceNotFound: The Resource 'vnet1' was not found.");
        assert_eq!(e.status_code, Some(404));
    }

    #[test]
    fn non_json_body_is_kept_verbatim() {
        let e = AzureError::from_status(502, "Bad Gateway");
        assert_eq!(e.message, "Bad Gateway");
    }

    #[test]
    fn auth_failure_detection() {
        assert!(AzureError::from_status(401, "").is_auth_failure());
        assert!(AzureError::not_authenticated().is_auth_failure());
        assert!(!AzureError::from_status(403, "").is_auth_failure());
    }

    #[test]
    fn display_includes_status() {
        let e = AzureError::with_status(AzureErrorKind::Conflict, "busy", 409);
        assert_eq!(e.to_string(), "[Resource conflict] (409) busy");
    }

    #[test]
    fn command_error_messages() {
        let e = CommandError::NotFound {
            kind: "Subscription",
            name: "contoso-sub".into(),
            scope: "tenant 'T1'".into(),
        };
        assert_eq!(e.to_string(), "Subscription 'contoso-sub' was not found in tenant 'T1'");

        let e = CommandError::DuplicateName {
            kind: "Subnet",
            name: "web".into(),
            parent: "vnet1".into(),
        };
        assert!(e.to_string().contains("already exists"));
    }

    #[test]
    fn remote_error_converts_into_command_error() {
        let e: CommandError = AzureError::from_status(500, "boom").into();
        assert!(matches!(e, CommandError::RemoteCallFailed(_)));
    }

    #[test]
    fn token_expiry() {
        let mut t = AzureToken::default();
        assert!(!t.is_expired());
        t.expires_at = Some(Utc::now() - chrono::Duration::minutes(1));
        assert!(t.is_expired());
    }

    #[test]
    fn credentials_completeness() {
        let mut c = AzureCredentials::default();
        assert!(!c.is_complete());
        c.client_id = "c".into();
        c.client_secret = "s".into();
        c.tenant_id = "t".into();
        assert!(c.is_complete());
    }

    #[test]
    fn config_defaults() {
        let c = AzureConfig::new();
        assert_eq!(c.max_retries, 0);
        assert_eq!(c.management_scope(), "https://management.azure.com/.default");
    }

    #[test]
    fn config_partial_json_keeps_defaults() {
        let c: AzureConfig = serde_json::from_str(r#"{"timeoutSecs":5}"#).unwrap();
        assert_eq!(c.timeout_secs, 5);
        assert_eq!(c.api_version_network, api_versions::NETWORK);
    }

    #[test]
    fn arm_list_deserialization() {
        let list: ArmList<serde_json::Value> =
            serde_json::from_str(r#"{"value":[1,2],"nextLink":"https://x/next"}"#).unwrap();
        assert_eq!(list.value.len(), 2);
        assert_eq!(list.next_link.as_deref(), Some("https://x/next"));
    }
}
