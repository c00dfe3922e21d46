//! Narrow client interfaces the commands depend on.
//!
//! `get` returns `Ok(None)` when the resource does not exist; every other
//! failure is an [`AzureError`](crate::types::AzureError). Implementations
//! backed by the ARM REST API live in `networking`, `subscriptions` and
//! `recovery_services`.

use async_trait::async_trait;

use crate::types::AzureResult;
use crate::wire;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VirtualNetworkClient: Send + Sync {
    async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        network: &wire::VirtualNetwork,
    ) -> AzureResult<wire::VirtualNetwork>;

    async fn get(
        &self,
        resource_group: &str,
        name: &str,
    ) -> AzureResult<Option<wire::VirtualNetwork>>;

    /// Returns the HTTP status code of the accepted delete.
    async fn delete(&self, resource_group: &str, name: &str) -> AzureResult<u16>;

    async fn list(&self, resource_group: &str) -> AzureResult<Vec<wire::VirtualNetwork>>;

    async fn list_all(&self) -> AzureResult<Vec<wire::VirtualNetwork>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionClient: Send + Sync {
    async fn list(&self, tenant_id: &str) -> AzureResult<Vec<wire::Subscription>>;

    async fn get(
        &self,
        tenant_id: &str,
        subscription_id: &str,
    ) -> AzureResult<Option<wire::Subscription>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VaultClient: Send + Sync {
    async fn get(&self, resource_group: &str, name: &str) -> AzureResult<Option<wire::Vault>>;

    async fn list(&self, resource_group: &str) -> AzureResult<Vec<wire::Vault>>;

    /// Returns the HTTP status code of the accepted delete.
    async fn delete(&self, resource_group: &str, name: &str) -> AzureResult<u16>;
}
