//! Presentation models: the user-facing shape of each resource.
//!
//! Commands print these and accept them back as input, so every type here
//! round-trips through camelCase JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One tag entry. Tags are kept as an ordered list on this side; keys are
/// unique case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Reference to another resource (security group, route table, ...).
///
/// Accepts a full resource object on input; only the id is kept.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReference {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ResourceReference {
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetwork {
    pub name: String,
    #[serde(default)]
    pub resource_group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default)]
    pub address_prefixes: Vec<String>,
    #[serde(default)]
    pub dns_servers: Vec<String>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Resource members not modelled above, written back unchanged.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub other: Map<String, Value>,
    /// Unmodelled members of the resource's `properties` bag.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub other_properties: Map<String, Value>,
}

impl VirtualNetwork {
    /// Case-insensitive lookup of a child subnet.
    pub fn find_subnet(&self, name: &str) -> Option<&Subnet> {
        self.subnets
            .iter()
            .find(|s| s.name.to_lowercase() == name.to_lowercase())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_security_group: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_table: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub other: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub other_properties: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryVault {
    pub name: String,
    #[serde(default)]
    pub resource_group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Result of a vault operation that has no resource to return.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaultOperationOutput {
    pub response: String,
}

/// Extract the resource-group segment from an ARM resource id.
pub fn resource_group_from_id(id: &str) -> Option<String> {
    let mut segments = id.split('/').filter(|s| !s.is_empty());
    while let Some(seg) = segments.next() {
        if seg.eq_ignore_ascii_case("resourceGroups") {
            return segments.next().map(str::to_string);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_group_parsed_from_id() {
        let id = "/subscriptions/s1/resourceGroups/rg-net/providers/Microsoft.Network/virtualNetworks/v1";
        assert_eq!(resource_group_from_id(id).as_deref(), Some("rg-net"));
        let lower = "/subscriptions/s1/resourcegroups/rg2/providers/x";
        assert_eq!(resource_group_from_id(lower).as_deref(), Some("rg2"));
        assert_eq!(resource_group_from_id("/subscriptions/s1"), None);
    }

    #[test]
    fn find_subnet_ignores_case() {
        let vnet = VirtualNetwork {
            name: "v".into(),
            subnets: vec![Subnet {
                name: "FrontEnd".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(vnet.find_subnet("frontend").is_some());
        assert!(vnet.find_subnet("backend").is_none());
    }

    #[test]
    fn reference_accepts_full_resource_object() {
        let json = r#"{"id":"/nsg/1","name":"nsg1","location":"eastus","securityRules":[]}"#;
        let r: ResourceReference = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, "/nsg/1");
        assert_eq!(r.name.as_deref(), Some("nsg1"));
    }

    #[test]
    fn vnet_input_with_minimal_fields() {
        let v: VirtualNetwork =
            serde_json::from_str(r#"{"name":"vnet1","resourceGroupName":"rg1"}"#).unwrap();
        assert!(v.subnets.is_empty());
        assert!(v.tags.is_empty());
    }
}
