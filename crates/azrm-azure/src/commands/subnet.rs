//! `vnet subnet new` and `vnet subnet add`.

use log::info;

use super::{mapping_error, not_found, require, resource_group_scope};
use crate::models::{ResourceReference, Subnet, VirtualNetwork};
use crate::resource_client::VirtualNetworkClient;
use crate::types::{CommandError, CommandResult};
use crate::wire;

/// A reference to another resource, given either as an id or as the
/// resource object itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceInput {
    Id(String),
    Resource(ResourceReference),
}

impl ReferenceInput {
    /// The referenced id, or `None` when it is blank.
    pub fn resolve(self) -> Option<ResourceReference> {
        let id = match self {
            ReferenceInput::Id(id) => id,
            ReferenceInput::Resource(r) => r.id,
        };
        if id.trim().is_empty() {
            None
        } else {
            Some(ResourceReference::from_id(id))
        }
    }
}

/// Properties of a subnet to create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetConfig {
    pub name: String,
    pub address_prefix: Option<String>,
    pub network_security_group: Option<ReferenceInput>,
    pub route_table: Option<ReferenceInput>,
}

impl SubnetConfig {
    pub fn into_subnet(self) -> Subnet {
        Subnet {
            name: self.name,
            address_prefix: self.address_prefix,
            network_security_group: self.network_security_group.and_then(ReferenceInput::resolve),
            route_table: self.route_table.and_then(ReferenceInput::resolve),
            ..Default::default()
        }
    }
}

/// Where the parent network of `vnet subnet add` comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddSubnetMode {
    /// Parent already in hand; the result is not persisted.
    Local(VirtualNetwork),
    /// Parent fetched by name; the result is persisted immediately.
    ByResource {
        resource_group: String,
        virtual_network_name: String,
    },
}

/// Build a standalone subnet value. No remote calls.
pub fn new_subnet_config(config: SubnetConfig) -> CommandResult<Subnet> {
    require("subnet name", &config.name)?;
    Ok(config.into_subnet())
}

/// Return `vnet` with one more subnet, or `DuplicateName` if a subnet with
/// the same name (ignoring case) is already present.
pub fn append_subnet(vnet: VirtualNetwork, config: SubnetConfig) -> CommandResult<VirtualNetwork> {
    if vnet.find_subnet(&config.name).is_some() {
        return Err(CommandError::DuplicateName {
            kind: "Subnet",
            name: config.name,
            parent: vnet.name,
        });
    }

    let mut subnets = vnet.subnets;
    subnets.push(config.into_subnet());
    Ok(VirtualNetwork { subnets, ..vnet })
}

pub async fn add_subnet(
    client: &dyn VirtualNetworkClient,
    mode: AddSubnetMode,
    config: SubnetConfig,
) -> CommandResult<VirtualNetwork> {
    require("subnet name", &config.name)?;

    match mode {
        AddSubnetMode::Local(vnet) => {
            info!("vnet subnet add (local): {} → {}", config.name, vnet.name);
            append_subnet(vnet, config)
        }
        AddSubnetMode::ByResource {
            resource_group,
            virtual_network_name,
        } => {
            require("resource group", &resource_group)?;
            require("virtual network name", &virtual_network_name)?;
            info!(
                "vnet subnet add: {} → {}/{}",
                config.name, resource_group, virtual_network_name
            );

            let current = client
                .get(&resource_group, &virtual_network_name)
                .await?
                .ok_or_else(|| {
                    not_found(
                        "Virtual network",
                        &virtual_network_name,
                        resource_group_scope(&resource_group),
                    )
                })?;

            let updated = append_subnet(VirtualNetwork::from(current), config)?;
            let body = wire::VirtualNetwork::try_from(&updated).map_err(mapping_error)?;
            let stored = client
                .create_or_update(&resource_group, &updated.name, &body)
                .await?;

            Ok(VirtualNetwork {
                resource_group_name: resource_group,
                ..VirtualNetwork::from(stored)
            })
        }
    }
}
