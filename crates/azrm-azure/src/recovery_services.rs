//! Recovery Services vaults (Site Recovery).

use async_trait::async_trait;
use log::debug;

use crate::client::AzureClient;
use crate::resource_client::VaultClient;
use crate::types::AzureResult;
use crate::wire::Vault;

fn vault_path(client: &AzureClient, name: &str) -> String {
    format!(
        "/providers/Microsoft.RecoveryServices/vaults/{}?api-version={}",
        name,
        client.config().api_version_recovery_services
    )
}

pub async fn list_vaults_in_rg(client: &AzureClient, rg: &str) -> AzureResult<Vec<Vault>> {
    let url = client.resource_group_url(
        rg,
        &format!(
            "/providers/Microsoft.RecoveryServices/vaults?api-version={}",
            client.config().api_version_recovery_services
        ),
    )?;
    debug!("list_vaults_in_rg({}) → {}", rg, url);
    client.get_all_pages(&url).await
}

pub async fn get_vault(client: &AzureClient, rg: &str, name: &str) -> AzureResult<Option<Vault>> {
    let url = client.resource_group_url(rg, &vault_path(client, name))?;
    debug!("get_vault({}/{}) → {}", rg, name, url);
    client.get_optional(&url).await
}

pub async fn delete_vault(client: &AzureClient, rg: &str, name: &str) -> AzureResult<u16> {
    let url = client.resource_group_url(rg, &vault_path(client, name))?;
    debug!("delete_vault({}/{}) → {}", rg, name, url);
    client.delete(&url).await
}

#[async_trait]
impl VaultClient for AzureClient {
    async fn get(&self, resource_group: &str, name: &str) -> AzureResult<Option<Vault>> {
        get_vault(self, resource_group, name).await
    }

    async fn list(&self, resource_group: &str) -> AzureResult<Vec<Vault>> {
        list_vaults_in_rg(self, resource_group).await
    }

    async fn delete(&self, resource_group: &str, name: &str) -> AzureResult<u16> {
        delete_vault(self, resource_group, name).await
    }
}
