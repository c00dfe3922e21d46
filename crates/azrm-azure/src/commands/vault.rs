//! `vault get` and `vault remove`.

use log::info;
use reqwest::StatusCode;

use super::{not_found, require, resource_group_scope, Outcome};
use crate::models::{resource_group_from_id, RecoveryVault, VaultOperationOutput};
use crate::resource_client::VaultClient;
use crate::types::CommandResult;

pub const VAULT_DELETED: &str = "Vault deleted successfully";

/// Which vault `vault remove` acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultTarget {
    /// A vault value, typically piped from `vault get`.
    ByObject(RecoveryVault),
    ByName { resource_group: String, name: String },
}

impl VaultTarget {
    /// Resolve to `(resource_group, name)`. An object without a resource
    /// group name falls back to the segment in its id.
    fn into_parts(self) -> CommandResult<(String, String)> {
        let (resource_group, name) = match self {
            VaultTarget::ByObject(v) => {
                let rg = if v.resource_group_name.trim().is_empty() {
                    v.id
                        .as_deref()
                        .and_then(resource_group_from_id)
                        .unwrap_or_default()
                } else {
                    v.resource_group_name
                };
                (rg, v.name)
            }
            VaultTarget::ByName {
                resource_group,
                name,
            } => (resource_group, name),
        };
        require("resource group", &resource_group)?;
        require("vault name", &name)?;
        Ok((resource_group, name))
    }
}

/// Invocation modes of `vault get`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetVault {
    ByName { resource_group: String, name: String },
    InResourceGroup(String),
}

/// Message reported for a successful delete with the given status.
pub fn deletion_outcome(status: u16) -> String {
    if status == 200 {
        return VAULT_DELETED.to_string();
    }
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(|reason| reason.replace(' ', ""))
        .unwrap_or_else(|| status.to_string())
}

pub async fn remove_vault(
    client: &dyn VaultClient,
    target: VaultTarget,
) -> CommandResult<VaultOperationOutput> {
    let (resource_group, name) = target.into_parts()?;
    info!("vault remove: {}/{}", resource_group, name);

    let status = client.delete(&resource_group, &name).await?;
    Ok(VaultOperationOutput {
        response: deletion_outcome(status),
    })
}

pub async fn get_vault(
    client: &dyn VaultClient,
    query: GetVault,
) -> CommandResult<Outcome<RecoveryVault>> {
    match query {
        GetVault::ByName {
            resource_group,
            name,
        } => {
            require("vault name", &name)?;
            let found = client
                .get(&resource_group, &name)
                .await?
                .ok_or_else(|| not_found("Vault", &name, resource_group_scope(&resource_group)))?;
            Ok(Outcome::One(RecoveryVault {
                resource_group_name: resource_group,
                ..RecoveryVault::from(found)
            }))
        }
        GetVault::InResourceGroup(resource_group) => {
            require("resource group", &resource_group)?;
            let items = client.list(&resource_group).await?;
            Ok(Outcome::Many(
                items
                    .into_iter()
                    .map(|w| RecoveryVault {
                        resource_group_name: resource_group.clone(),
                        ..RecoveryVault::from(w)
                    })
                    .collect(),
            ))
        }
    }
}
