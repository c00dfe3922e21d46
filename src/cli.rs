//! Command-line surface.
//!
//! Arguments are parsed by clap and converted once, here, into the
//! invocation-mode enums the commands take.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use azrm_azure::commands::subnet::{AddSubnetMode, ReferenceInput, SubnetConfig};
use azrm_azure::commands::subscription::GetSubscription;
use azrm_azure::commands::vault::{GetVault, VaultTarget};
use azrm_azure::commands::virtual_network::{GetVirtualNetwork, SetVirtualNetwork};
use azrm_azure::models::{ResourceReference, VirtualNetwork};
use azrm_azure::service::AzureService;
use azrm_azure::types::AzureCredentials;
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::logging::LogFormat;
use crate::output::OutputFormat;

/// Value of an input option that means "read standard input".
pub const STDIN: &str = "-";

#[derive(Debug, Parser)]
#[command(name = "azrm", version)]
#[command(about = "Manage Azure virtual networks, subscriptions and Recovery Services vaults", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Settings file (default: <config dir>/azrm/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Output format (json, yaml)
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Emit sequences as a single array instead of one document per item
    #[arg(long, global = true)]
    pub batch: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Credential flags; each one overrides the settings file and environment.
#[derive(Debug, Default, Args)]
pub struct CredentialArgs {
    #[arg(long, global = true)]
    pub tenant_id: Option<String>,
    #[arg(long, global = true)]
    pub client_id: Option<String>,
    #[arg(long, global = true)]
    pub client_secret: Option<String>,
    #[arg(long, global = true)]
    pub subscription_id: Option<String>,
}

impl CredentialArgs {
    pub fn apply(self, creds: &mut AzureCredentials) {
        for (flag, field) in [
            (self.tenant_id, &mut creds.tenant_id),
            (self.client_id, &mut creds.client_id),
            (self.client_secret, &mut creds.client_secret),
            (self.subscription_id, &mut creds.subscription_id),
        ] {
            if let Some(value) = flag {
                *field = value;
            }
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Virtual networks and their subnets
    Vnet {
        #[command(subcommand)]
        command: VnetCommand,
    },
    /// Subscriptions visible to the service principal
    Subscription {
        #[command(subcommand)]
        command: SubscriptionCommand,
    },
    /// Recovery Services vaults
    Vault {
        #[command(subcommand)]
        command: VaultCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum VnetCommand {
    /// Update an existing virtual network
    Set(VnetSetArgs),
    /// Get one virtual network, or list them
    Get(VnetGetArgs),
    /// Subnets of a virtual network
    Subnet {
        #[command(subcommand)]
        command: SubnetCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum SubnetCommand {
    /// Add a subnet to a virtual network
    Add(SubnetAddArgs),
    /// Build a subnet value without contacting Azure
    New(SubnetNewArgs),
}

#[derive(Debug, Subcommand)]
pub enum SubscriptionCommand {
    /// Get subscriptions by name or id, or list them
    Get(SubscriptionGetArgs),
}

#[derive(Debug, Subcommand)]
pub enum VaultCommand {
    /// Get one vault, or list the vaults of a resource group
    Get(VaultGetArgs),
    /// Remove a vault
    Remove(VaultRemoveArgs),
}

// ── vnet set ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["input", "name"])))]
pub struct VnetSetArgs {
    /// Virtual network object (JSON or YAML file, `-` for stdin)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Name of the virtual network to update
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short = 'g', long, conflicts_with = "input")]
    pub resource_group: Option<String>,

    /// Replacement address prefixes (repeatable or comma-separated)
    #[arg(long = "address-prefix", value_delimiter = ',', conflicts_with = "input")]
    pub address_prefixes: Vec<String>,

    /// Replacement DNS servers (repeatable or comma-separated)
    #[arg(long = "dns-server", value_delimiter = ',', conflicts_with = "input")]
    pub dns_servers: Vec<String>,
}

impl VnetSetArgs {
    pub fn into_mode(self, service: &AzureService) -> Result<SetVirtualNetwork, AppError> {
        if let Some(input) = self.input {
            return Ok(SetVirtualNetwork::ByObject(read_object(&input)?));
        }
        Ok(SetVirtualNetwork::ByName {
            name: self.name.unwrap_or_default(),
            resource_group: service.resource_group(self.resource_group)?,
            address_prefixes: supplied(self.address_prefixes),
            dns_servers: supplied(self.dns_servers),
        })
    }
}

// ── vnet get ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VnetGetArgs {
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short = 'g', long)]
    pub resource_group: Option<String>,
}

impl VnetGetArgs {
    /// A name needs a resource group (explicit or default); without a name
    /// an explicit group lists that group and no group lists everything.
    pub fn into_query(self, service: &AzureService) -> Result<GetVirtualNetwork, AppError> {
        Ok(match (self.name, self.resource_group) {
            (Some(name), rg) => GetVirtualNetwork::ByName {
                resource_group: service.resource_group(rg)?,
                name,
            },
            (None, Some(rg)) => GetVirtualNetwork::InResourceGroup(rg),
            (None, None) => GetVirtualNetwork::All,
        })
    }
}

// ── vnet subnet new / add ───────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SubnetConfigArgs {
    /// Subnet name
    #[arg(short, long)]
    pub name: String,

    #[arg(long)]
    pub address_prefix: Option<String>,

    /// Network security group id
    #[arg(long, conflicts_with = "nsg_input")]
    pub nsg_id: Option<String>,

    /// Network security group object (file, `-` for stdin)
    #[arg(long)]
    pub nsg_input: Option<String>,

    /// Route table id
    #[arg(long, conflicts_with = "route_table_input")]
    pub route_table_id: Option<String>,

    /// Route table object (file, `-` for stdin)
    #[arg(long)]
    pub route_table_input: Option<String>,
}

impl SubnetConfigArgs {
    fn inputs(&self) -> [(&'static str, Option<&str>); 2] {
        [
            ("--nsg-input", self.nsg_input.as_deref()),
            ("--route-table-input", self.route_table_input.as_deref()),
        ]
    }

    pub fn into_config(self) -> Result<SubnetConfig, AppError> {
        single_stdin(&self.inputs())?;
        Ok(SubnetConfig {
            name: self.name,
            address_prefix: self.address_prefix,
            network_security_group: reference(self.nsg_id, self.nsg_input)?,
            route_table: reference(self.route_table_id, self.route_table_input)?,
        })
    }
}

#[derive(Debug, Args)]
pub struct SubnetNewArgs {
    #[command(flatten)]
    pub subnet: SubnetConfigArgs,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("parent").required(true).args(["vnet_input", "vnet_name"])))]
pub struct SubnetAddArgs {
    #[command(flatten)]
    pub subnet: SubnetConfigArgs,

    /// Parent virtual network object (file, `-` for stdin); the result is
    /// printed, not saved
    #[arg(long)]
    pub vnet_input: Option<String>,

    /// Parent virtual network name; the result is saved immediately
    #[arg(long)]
    pub vnet_name: Option<String>,

    #[arg(short = 'g', long, conflicts_with = "vnet_input")]
    pub resource_group: Option<String>,
}

impl SubnetAddArgs {
    pub fn into_parts(self, service: &AzureService) -> Result<(AddSubnetMode, SubnetConfig), AppError> {
        let [nsg, route_table] = self.subnet.inputs();
        single_stdin(&[("--vnet-input", self.vnet_input.as_deref()), nsg, route_table])?;

        let mode = match (self.vnet_input, self.vnet_name) {
            (Some(input), _) => AddSubnetMode::Local(read_object::<VirtualNetwork>(&input)?),
            (None, name) => AddSubnetMode::ByResource {
                resource_group: service.resource_group(self.resource_group)?,
                virtual_network_name: name.unwrap_or_default(),
            },
        };
        Ok((mode, self.subnet.into_config()?))
    }
}

// ── subscription get ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SubscriptionGetArgs {
    /// Subscription id
    #[arg(long)]
    pub id: Option<String>,

    /// Subscription display name (case-insensitive); wins over --id
    #[arg(short, long)]
    pub name: Option<String>,

    /// Tenant to query (default: tenant of the active credentials)
    #[arg(long)]
    pub tenant: Option<String>,
}

impl SubscriptionGetArgs {
    pub fn into_query(self) -> Result<GetSubscription, AppError> {
        Ok(GetSubscription::from_filters(self.id, self.name, self.tenant)?)
    }
}

// ── vault get / remove ──────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VaultGetArgs {
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short = 'g', long)]
    pub resource_group: Option<String>,
}

impl VaultGetArgs {
    pub fn into_query(self, service: &AzureService) -> Result<GetVault, AppError> {
        let resource_group = service.resource_group(self.resource_group)?;
        Ok(match self.name {
            Some(name) => GetVault::ByName {
                resource_group,
                name,
            },
            None => GetVault::InResourceGroup(resource_group),
        })
    }
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["input", "name"])))]
pub struct VaultRemoveArgs {
    /// Vault object, e.g. from `vault get` (file, `-` for stdin)
    #[arg(short, long)]
    pub input: Option<String>,

    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short = 'g', long, conflicts_with = "input")]
    pub resource_group: Option<String>,
}

impl VaultRemoveArgs {
    pub fn into_target(self, service: &AzureService) -> Result<VaultTarget, AppError> {
        if let Some(input) = self.input {
            return Ok(VaultTarget::ByObject(read_object(&input)?));
        }
        Ok(VaultTarget::ByName {
            resource_group: service.resource_group(self.resource_group)?,
            name: self.name.unwrap_or_default(),
        })
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn supplied(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Stdin can be consumed once per invocation.
fn single_stdin(inputs: &[(&str, Option<&str>)]) -> Result<(), AppError> {
    let flags: Vec<&str> = inputs
        .iter()
        .filter(|(_, origin)| *origin == Some(STDIN))
        .map(|(flag, _)| *flag)
        .collect();
    if flags.len() > 1 {
        return Err(AppError::StdinReused(flags.join(", ")));
    }
    Ok(())
}

fn reference(id: Option<String>, input: Option<String>) -> Result<Option<ReferenceInput>, AppError> {
    match (id, input) {
        (Some(id), _) => Ok(Some(ReferenceInput::Id(id))),
        (None, Some(input)) => Ok(Some(ReferenceInput::Resource(
            read_object::<ResourceReference>(&input)?,
        ))),
        (None, None) => Ok(None),
    }
}

/// Read an object from a file, or from stdin for `-`. JSON documents are
/// recognised by their leading brace; anything else is parsed as YAML.
pub fn read_object<T: DeserializeOwned>(origin: &str) -> Result<T, AppError> {
    let read = if origin == STDIN {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        fs::read_to_string(origin)
    };
    let text = read.map_err(|error| AppError::Input {
        origin: origin.to_string(),
        error,
    })?;
    parse_object(origin, &text)
}

pub fn parse_object<T: DeserializeOwned>(origin: &str, text: &str) -> Result<T, AppError> {
    let invalid = |message: String| AppError::InvalidObject {
        origin: origin.to_string(),
        message,
    };
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') {
        serde_json::from_str(trimmed).map_err(|e| invalid(e.to_string()))
    } else {
        serde_yaml::from_str(trimmed).map_err(|e| invalid(e.to_string()))
    }
}
