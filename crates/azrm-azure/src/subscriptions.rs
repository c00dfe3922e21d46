//! Subscriptions visible to the service principal, per tenant.

use async_trait::async_trait;
use log::debug;

use crate::auth;
use crate::client::AzureClient;
use crate::resource_client::SubscriptionClient;
use crate::types::{AzureError, AzureResult};
use crate::wire::Subscription;

/// A client whose token was issued for `tenant_id`, acquiring a fresh token
/// when the current one belongs to another tenant.
async fn client_for_tenant(client: &AzureClient, tenant_id: &str) -> AzureResult<AzureClient> {
    let current = client.token().and_then(|t| t.tenant_id.as_deref());
    if current == Some(tenant_id) && client.is_authenticated() {
        return Ok(client.clone());
    }
    let creds = client
        .credentials()
        .ok_or_else(AzureError::not_authenticated)?;
    let token = auth::acquire_token(client, creds, tenant_id).await?;
    let mut scoped = client.clone();
    scoped.set_token(token);
    Ok(scoped)
}

pub async fn list_subscriptions(
    client: &AzureClient,
    tenant_id: &str,
) -> AzureResult<Vec<Subscription>> {
    let scoped = client_for_tenant(client, tenant_id).await?;
    let url = scoped.arm_url(&format!(
        "/subscriptions?api-version={}",
        client.config().api_version_subscriptions
    ));
    debug!("list_subscriptions({}) → {}", tenant_id, url);
    // The token is scoped to the tenant, so the listing is already limited to it.
    scoped.get_all_pages(&url).await
}

pub async fn get_subscription(
    client: &AzureClient,
    tenant_id: &str,
    subscription_id: &str,
) -> AzureResult<Option<Subscription>> {
    let scoped = client_for_tenant(client, tenant_id).await?;
    let url = scoped.arm_url(&format!(
        "/subscriptions/{}?api-version={}",
        subscription_id,
        client.config().api_version_subscriptions
    ));
    debug!("get_subscription({}/{}) → {}", tenant_id, subscription_id, url);
    scoped.get_optional(&url).await
}

#[async_trait]
impl SubscriptionClient for AzureClient {
    async fn list(&self, tenant_id: &str) -> AzureResult<Vec<Subscription>> {
        list_subscriptions(self, tenant_id).await
    }

    async fn get(&self, tenant_id: &str, subscription_id: &str) -> AzureResult<Option<Subscription>> {
        get_subscription(self, tenant_id, subscription_id).await
    }
}
