//! Azure Networking – virtual networks (subnets travel inside their parent).

use async_trait::async_trait;
use log::debug;

use crate::client::AzureClient;
use crate::resource_client::VirtualNetworkClient;
use crate::types::AzureResult;
use crate::wire::VirtualNetwork;

fn vnet_path(client: &AzureClient, vnet_name: &str) -> String {
    format!(
        "/providers/Microsoft.Network/virtualNetworks/{}?api-version={}",
        vnet_name,
        client.config().api_version_network
    )
}

pub async fn list_vnets(client: &AzureClient) -> AzureResult<Vec<VirtualNetwork>> {
    let api = &client.config().api_version_network;
    let url = client.subscription_url(&format!(
        "/providers/Microsoft.Network/virtualNetworks?api-version={}",
        api
    ))?;
    debug!("list_vnets → {}", url);
    client.get_all_pages(&url).await
}

pub async fn list_vnets_in_rg(client: &AzureClient, rg: &str) -> AzureResult<Vec<VirtualNetwork>> {
    let api = &client.config().api_version_network;
    let url = client.resource_group_url(
        rg,
        &format!(
            "/providers/Microsoft.Network/virtualNetworks?api-version={}",
            api
        ),
    )?;
    debug!("list_vnets_in_rg({}) → {}", rg, url);
    client.get_all_pages(&url).await
}

pub async fn get_vnet(
    client: &AzureClient,
    rg: &str,
    vnet_name: &str,
) -> AzureResult<Option<VirtualNetwork>> {
    let url = client.resource_group_url(rg, &vnet_path(client, vnet_name))?;
    debug!("get_vnet({}/{}) → {}", rg, vnet_name, url);
    client.get_optional(&url).await
}

pub async fn put_vnet(
    client: &AzureClient,
    rg: &str,
    vnet_name: &str,
    vnet: &VirtualNetwork,
) -> AzureResult<VirtualNetwork> {
    let url = client.resource_group_url(rg, &vnet_path(client, vnet_name))?;
    debug!("put_vnet({}/{}) → {}", rg, vnet_name, url);
    client.put_json(&url, vnet).await
}

pub async fn delete_vnet(client: &AzureClient, rg: &str, vnet_name: &str) -> AzureResult<u16> {
    let url = client.resource_group_url(rg, &vnet_path(client, vnet_name))?;
    debug!("delete_vnet({}/{}) → {}", rg, vnet_name, url);
    client.delete(&url).await
}

#[async_trait]
impl VirtualNetworkClient for AzureClient {
    async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        network: &VirtualNetwork,
    ) -> AzureResult<VirtualNetwork> {
        put_vnet(self, resource_group, name, network).await
    }

    async fn get(&self, resource_group: &str, name: &str) -> AzureResult<Option<VirtualNetwork>> {
        get_vnet(self, resource_group, name).await
    }

    async fn delete(&self, resource_group: &str, name: &str) -> AzureResult<u16> {
        delete_vnet(self, resource_group, name).await
    }

    async fn list(&self, resource_group: &str) -> AzureResult<Vec<VirtualNetwork>> {
        list_vnets_in_rg(self, resource_group).await
    }

    async fn list_all(&self) -> AzureResult<Vec<VirtualNetwork>> {
        list_vnets(self).await
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AzureConfig, AzureCredentials, AzureErrorKind};

    fn client() -> AzureClient {
        let mut c = AzureClient::new(AzureConfig::new()).unwrap();
        c.set_credentials(AzureCredentials {
            subscription_id: "s1".into(),
            ..Default::default()
        });
        c
    }

    #[test]
    fn vnet_url_pattern() {
        let c = client();
        let url = c.resource_group_url("rg1", &vnet_path(&c, "vnet1")).unwrap();
        assert_eq!(
            url,
            "https://management.azure.com/subscriptions/s1/resourceGroups/rg1/providers/Microsoft.Network/virtualNetworks/vnet1?api-version=2024-01-01"
        );
    }

    #[tokio::test]
    async fn trait_calls_require_a_token() {
        let c = client();
        let err = VirtualNetworkClient::get(&c, "rg1", "vnet1").await.unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::NotAuthenticated);
    }
}
