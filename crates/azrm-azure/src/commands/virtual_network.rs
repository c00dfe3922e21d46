//! `vnet set` and `vnet get`.

use log::info;

use super::{mapping_error, not_found, require, resource_group_scope, Outcome};
use crate::models::VirtualNetwork;
use crate::resource_client::VirtualNetworkClient;
use crate::types::{AzureError, AzureErrorKind, CommandResult};
use crate::wire;

/// Invocation modes of `vnet set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetVirtualNetwork {
    /// A complete network value; the network must already exist.
    ByObject(VirtualNetwork),
    /// Update selected fields of a network looked up by name.
    ByName {
        name: String,
        resource_group: String,
        address_prefixes: Option<Vec<String>>,
        dns_servers: Option<Vec<String>>,
    },
}

/// Invocation modes of `vnet get`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetVirtualNetwork {
    ByName { resource_group: String, name: String },
    InResourceGroup(String),
    All,
}

pub async fn set_virtual_network(
    client: &dyn VirtualNetworkClient,
    mode: SetVirtualNetwork,
) -> CommandResult<VirtualNetwork> {
    match mode {
        SetVirtualNetwork::ByObject(vnet) => {
            require("name", &vnet.name)?;
            require("resourceGroupName", &vnet.resource_group_name)?;
            info!(
                "vnet set (object): {}/{}",
                vnet.resource_group_name, vnet.name
            );

            if client.get(&vnet.resource_group_name, &vnet.name).await?.is_none() {
                return Err(not_found(
                    "Virtual network",
                    &vnet.name,
                    resource_group_scope(&vnet.resource_group_name),
                ));
            }

            let body = wire::VirtualNetwork::try_from(&vnet).map_err(mapping_error)?;
            write_then_read(client, &vnet.resource_group_name, &vnet.name, &body).await
        }
        SetVirtualNetwork::ByName {
            name,
            resource_group,
            address_prefixes,
            dns_servers,
        } => {
            require("name", &name)?;
            require("resource group", &resource_group)?;
            info!("vnet set (name): {}/{}", resource_group, name);

            // No existence precondition here: a missing network surfaces as a
            // failed remote read rather than a command-level not-found.
            let current = client.get(&resource_group, &name).await?.ok_or_else(|| {
                AzureError::with_status(
                    AzureErrorKind::NotFound,
                    format!("ResourceNotFound: virtual network '{name}'"),
                    404,
                )
            })?;
            let current = VirtualNetwork::from(current);

            let updated = VirtualNetwork {
                name: name.clone(),
                resource_group_name: resource_group.clone(),
                // An omitted prefix list keeps the stored one instead of clearing it.
                address_prefixes: address_prefixes.unwrap_or(current.address_prefixes),
                dns_servers: dns_servers.unwrap_or(current.dns_servers),
                ..current
            };

            let body = wire::VirtualNetwork::try_from(&updated).map_err(mapping_error)?;
            write_then_read(client, &resource_group, &name, &body).await
        }
    }
}

/// One write, then one read of the authoritative post-state.
async fn write_then_read(
    client: &dyn VirtualNetworkClient,
    resource_group: &str,
    name: &str,
    body: &wire::VirtualNetwork,
) -> CommandResult<VirtualNetwork> {
    client.create_or_update(resource_group, name, body).await?;

    let stored = client
        .get(resource_group, name)
        .await?
        .ok_or_else(|| not_found("Virtual network", name, resource_group_scope(resource_group)))?;

    Ok(VirtualNetwork {
        resource_group_name: resource_group.to_string(),
        ..VirtualNetwork::from(stored)
    })
}

pub async fn get_virtual_network(
    client: &dyn VirtualNetworkClient,
    query: GetVirtualNetwork,
) -> CommandResult<Outcome<VirtualNetwork>> {
    match query {
        GetVirtualNetwork::ByName {
            resource_group,
            name,
        } => {
            require("name", &name)?;
            let found = client
                .get(&resource_group, &name)
                .await?
                .ok_or_else(|| not_found("Virtual network", &name, resource_group_scope(&resource_group)))?;
            Ok(Outcome::One(VirtualNetwork {
                resource_group_name: resource_group,
                ..VirtualNetwork::from(found)
            }))
        }
        GetVirtualNetwork::InResourceGroup(resource_group) => {
            let items = client.list(&resource_group).await?;
            Ok(Outcome::Many(
                items
                    .into_iter()
                    .map(|w| VirtualNetwork {
                        resource_group_name: resource_group.clone(),
                        ..VirtualNetwork::from(w)
                    })
                    .collect(),
            ))
        }
        GetVirtualNetwork::All => {
            let items = client.list_all().await?;
            Ok(Outcome::Many(items.into_iter().map(VirtualNetwork::from).collect()))
        }
    }
}
