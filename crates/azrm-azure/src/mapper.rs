//! Conversions between presentation models and ARM wire shapes.
//!
//! Wire → presentation is infallible. Presentation → wire can fail only on
//! tag conversion, which rejects duplicate keys.

use std::collections::HashMap;

use crate::models::{self, resource_group_from_id, ResourceReference, Tag};
use crate::types::{AzureError, AzureResult};
use crate::wire;

// ─── Tags ───────────────────────────────────────────────────────────

/// Build the wire tag mapping from an ordered tag list.
pub fn tags_to_map(tags: &[Tag]) -> AzureResult<HashMap<String, String>> {
    let mut map = HashMap::with_capacity(tags.len());
    for tag in tags {
        if tag.name.trim().is_empty() {
            return Err(AzureError::validation("Tag names must not be empty"));
        }
        if map.keys().any(|k: &String| k.eq_ignore_ascii_case(&tag.name)) {
            return Err(AzureError::validation(format!(
                "Duplicate tag name '{}'",
                tag.name
            )));
        }
        map.insert(tag.name.clone(), tag.value.clone());
    }
    Ok(map)
}

/// Build the ordered tag list from a wire mapping; sorted by key.
pub fn tags_from_map(map: &HashMap<String, String>) -> Vec<Tag> {
    let mut tags: Vec<Tag> = map
        .iter()
        .map(|(k, v)| Tag::new(k.clone(), v.clone()))
        .collect();
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    tags
}

fn reference_to_wire(r: &Option<ResourceReference>) -> Option<wire::SubResource> {
    r.as_ref()
        .filter(|r| !r.id.is_empty())
        .map(|r| wire::SubResource { id: r.id.clone() })
}

fn reference_from_wire(r: Option<wire::SubResource>) -> Option<ResourceReference> {
    r.filter(|r| !r.id.is_empty())
        .map(|r| ResourceReference::from_id(r.id))
}

fn non_empty(v: &[String]) -> Option<Vec<String>> {
    if v.is_empty() {
        None
    } else {
        Some(v.to_vec())
    }
}

// ─── Subnets ────────────────────────────────────────────────────────

impl From<&models::Subnet> for wire::Subnet {
    fn from(s: &models::Subnet) -> Self {
        wire::Subnet {
            id: s.id.clone(),
            name: Some(s.name.clone()),
            etag: None,
            properties: Some(wire::SubnetProperties {
                address_prefix: s.address_prefix.clone(),
                network_security_group: reference_to_wire(&s.network_security_group),
                route_table: reference_to_wire(&s.route_table),
                provisioning_state: None,
                other: s.other_properties.clone(),
            }),
            other: s.other.clone(),
        }
    }
}

impl From<wire::Subnet> for models::Subnet {
    fn from(s: wire::Subnet) -> Self {
        let props = s.properties.unwrap_or_default();
        models::Subnet {
            name: s.name.unwrap_or_default(),
            id: s.id,
            address_prefix: props.address_prefix,
            network_security_group: reference_from_wire(props.network_security_group),
            route_table: reference_from_wire(props.route_table),
            provisioning_state: props.provisioning_state,
            other: s.other,
            other_properties: props.other,
        }
    }
}

// ─── Virtual networks ───────────────────────────────────────────────

impl TryFrom<&models::VirtualNetwork> for wire::VirtualNetwork {
    type Error = AzureError;

    fn try_from(v: &models::VirtualNetwork) -> AzureResult<Self> {
        Ok(wire::VirtualNetwork {
            id: v.id.clone(),
            name: Some(v.name.clone()),
            location: v.location.clone(),
            etag: v.etag.clone(),
            tags: tags_to_map(&v.tags)?,
            properties: Some(wire::VnetProperties {
                address_space: non_empty(&v.address_prefixes)
                    .map(|address_prefixes| wire::AddressSpace { address_prefixes }),
                dhcp_options: non_empty(&v.dns_servers)
                    .map(|dns_servers| wire::DhcpOptions { dns_servers }),
                subnets: v.subnets.iter().map(wire::Subnet::from).collect(),
                provisioning_state: None,
                other: v.other_properties.clone(),
            }),
            other: v.other.clone(),
        })
    }
}

impl From<wire::VirtualNetwork> for models::VirtualNetwork {
    fn from(v: wire::VirtualNetwork) -> Self {
        let props = v.properties.unwrap_or_default();
        models::VirtualNetwork {
            name: v.name.unwrap_or_default(),
            resource_group_name: v
                .id
                .as_deref()
                .and_then(resource_group_from_id)
                .unwrap_or_default(),
            tags: tags_from_map(&v.tags),
            id: v.id,
            location: v.location,
            etag: v.etag,
            address_prefixes: props
                .address_space
                .map(|a| a.address_prefixes)
                .unwrap_or_default(),
            dns_servers: props
                .dhcp_options
                .map(|d| d.dns_servers)
                .unwrap_or_default(),
            subnets: props.subnets.into_iter().map(models::Subnet::from).collect(),
            provisioning_state: props.provisioning_state,
            other: v.other,
            other_properties: props.other,
        }
    }
}

// ─── Subscriptions ──────────────────────────────────────────────────

impl From<wire::Subscription> for models::Subscription {
    fn from(s: wire::Subscription) -> Self {
        models::Subscription {
            id: s.subscription_id,
            name: s.display_name,
            state: s.state,
            tenant_id: s.tenant_id,
        }
    }
}

// ─── Vaults ─────────────────────────────────────────────────────────

impl From<wire::Vault> for models::RecoveryVault {
    fn from(v: wire::Vault) -> Self {
        models::RecoveryVault {
            name: v.name.unwrap_or_default(),
            resource_group_name: v
                .id
                .as_deref()
                .and_then(resource_group_from_id)
                .unwrap_or_default(),
            tags: tags_from_map(&v.tags),
            id: v.id,
            location: v.location,
            resource_type: v.resource_type,
            sku: v.sku.map(|s| s.name),
            provisioning_state: v.properties.and_then(|p| p.provisioning_state),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_wire() -> wire::VirtualNetwork {
        serde_json::from_str(
            r#"{
                "id":"/subscriptions/s1/resourceGroups/rg1/providers/Microsoft.Network/virtualNetworks/vnet1",
                "name":"vnet1","location":"eastus","etag":"W/\"1\"",
                "tags":{"owner":"net-team","env":"prod"},
                "properties":{
                    "addressSpace":{"addressPrefixes":["10.0.0.0/16"]},
                    "subnets":[{"id":"/s/web","name":"web","properties":{"addressPrefix":"10.0.1.0/24","routeTable":{"id":"/rt/1"}}}],
                    "provisioningState":"Succeeded"
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn wire_to_presentation_vnet() {
        let v = models::VirtualNetwork::from(sample_wire());
        assert_eq!(v.name, "vnet1");
        assert_eq!(v.resource_group_name, "rg1");
        assert_eq!(v.address_prefixes, vec!["10.0.0.0/16"]);
        assert!(v.dns_servers.is_empty());
        assert_eq!(v.subnets.len(), 1);
        assert_eq!(v.subnets[0].route_table, Some(ResourceReference::from_id("/rt/1")));
        assert_eq!(
            v.tags,
            vec![Tag::new("env", "prod"), Tag::new("owner", "net-team")]
        );
    }

    #[test]
    fn presentation_to_wire_keeps_absent_fields_absent() {
        let v = models::VirtualNetwork {
            name: "vnet1".into(),
            resource_group_name: "rg1".into(),
            location: Some("eastus".into()),
            address_prefixes: vec!["10.0.0.0/16".into()],
            ..Default::default()
        };
        let w = wire::VirtualNetwork::try_from(&v).unwrap();
        let props = w.properties.unwrap();
        assert!(props.dhcp_options.is_none());
        assert!(w.tags.is_empty());
        assert!(w.id.is_none());
    }

    #[test]
    fn empty_reference_ids_are_dropped() {
        let s = models::Subnet {
            name: "web".into(),
            network_security_group: Some(ResourceReference::from_id("")),
            ..Default::default()
        };
        let w = wire::Subnet::from(&s);
        assert!(w.properties.unwrap().network_security_group.is_none());
    }

    #[test]
    fn unmodelled_members_are_written_back() {
        let stored: wire::VirtualNetwork = serde_json::from_str(
            r#"{
                "name":"vnet1","type":"Microsoft.Network/virtualNetworks",
                "properties":{
                    "enableDdosProtection":true,
                    "subnets":[{"name":"web","type":"Microsoft.Network/virtualNetworks/subnets","properties":{
                        "addressPrefix":"10.0.1.0/24",
                        "serviceEndpoints":[{"service":"Microsoft.Storage"}],
                        "delegations":[{"name":"d1"}]
                    }}]
                }
            }"#,
        )
        .unwrap();

        let mut v = models::VirtualNetwork::from(stored);
        assert!(v.subnets[0].other_properties.contains_key("serviceEndpoints"));
        v.subnets.push(models::Subnet {
            name: "app".into(),
            address_prefix: Some("10.0.2.0/24".into()),
            ..Default::default()
        });

        let body = serde_json::to_value(wire::VirtualNetwork::try_from(&v).unwrap()).unwrap();
        assert_eq!(body["type"], "Microsoft.Network/virtualNetworks");
        assert_eq!(body["properties"]["enableDdosProtection"], true);
        let web = &body["properties"]["subnets"][0];
        assert_eq!(web["type"], "Microsoft.Network/virtualNetworks/subnets");
        assert_eq!(web["properties"]["serviceEndpoints"][0]["service"], "Microsoft.Storage");
        assert_eq!(web["properties"]["delegations"][0]["name"], "d1");
        let app = &body["properties"]["subnets"][1]["properties"];
        assert!(app.get("serviceEndpoints").is_none());
    }

    #[test]
    fn duplicate_tags_are_rejected() {
        let tags = vec![Tag::new("Env", "a"), Tag::new("env", "b")];
        let err = tags_to_map(&tags).unwrap_err();
        assert_eq!(err.kind, crate::types::AzureErrorKind::Validation);
    }

    #[test]
    fn tag_conversion_preserves_pairs() {
        let tags = vec![Tag::new("b", "2"), Tag::new("a", "1")];
        let map = tags_to_map(&tags).unwrap();
        assert_eq!(map.get("a").map(String::as_str), Some("1"));
        assert_eq!(tags_from_map(&map), vec![Tag::new("a", "1"), Tag::new("b", "2")]);
    }

    #[test]
    fn subscription_mapping() {
        let s = models::Subscription::from(wire::Subscription {
            id: "/subscriptions/s1".into(),
            subscription_id: "s1".into(),
            display_name: "contoso-sub".into(),
            state: "Enabled".into(),
            tenant_id: Some("T1".into()),
        });
        assert_eq!(s.id, "s1");
        assert_eq!(s.name, "contoso-sub");
    }

    #[test]
    fn vault_mapping() {
        let v = models::RecoveryVault::from(wire::Vault {
            id: Some("/subscriptions/s1/resourceGroups/rg9/providers/Microsoft.RecoveryServices/vaults/v1".into()),
            name: Some("v1".into()),
            sku: Some(wire::VaultSku { name: "Standard".into() }),
            ..Default::default()
        });
        assert_eq!(v.resource_group_name, "rg9");
        assert_eq!(v.sku.as_deref(), Some("Standard"));
    }
}
