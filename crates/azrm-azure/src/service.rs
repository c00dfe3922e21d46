//! Central service façade for the management commands.
//!
//! Owns the authenticated `AzureClient` plus invocation defaults, and runs
//! each command against it. Commands themselves only see the resource-client
//! traits.

use log::info;

use crate::auth;
use crate::client::AzureClient;
use crate::commands::subnet::{self, AddSubnetMode, SubnetConfig};
use crate::commands::subscription::{self, GetSubscription};
use crate::commands::vault::{self, GetVault, VaultTarget};
use crate::commands::virtual_network::{self, GetVirtualNetwork, SetVirtualNetwork};
use crate::commands::Outcome;
use crate::models::{RecoveryVault, Subscription, VaultOperationOutput, VirtualNetwork};
use crate::types::*;

pub struct AzureService {
    client: AzureClient,
    default_resource_group: Option<String>,
}

impl AzureService {
    pub fn new(config: AzureConfig) -> AzureResult<Self> {
        Ok(Self {
            client: AzureClient::new(config)?,
            default_resource_group: None,
        })
    }

    // ── Configuration ────────────────────────────────────────────────

    pub fn set_credentials(&mut self, creds: AzureCredentials) {
        self.client.set_credentials(creds);
    }

    pub fn set_default_resource_group(&mut self, rg: Option<String>) {
        self.default_resource_group = rg.filter(|r| !r.trim().is_empty());
    }

    /// The explicit resource group if given, otherwise the configured
    /// default.
    pub fn resource_group(&self, explicit: Option<String>) -> CommandResult<String> {
        explicit
            .filter(|r| !r.trim().is_empty())
            .or_else(|| self.default_resource_group.clone())
            .ok_or_else(|| {
                CommandError::InvalidInput(
                    "no resource group given and no default configured".into(),
                )
            })
    }

    pub fn client(&self) -> &AzureClient {
        &self.client
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    // ── Auth ─────────────────────────────────────────────────────────

    /// Acquire a management token for the credentials' own tenant.
    pub async fn authenticate(&mut self) -> CommandResult<()> {
        let creds = self
            .client
            .credentials()
            .cloned()
            .ok_or_else(|| CommandError::InvalidInput("no credentials configured".into()))?;
        let tenant = creds.tenant_id.clone();
        let token = auth::acquire_token(&self.client, &creds, &tenant)
            .await
            .map_err(|e| match e.kind {
                AzureErrorKind::Validation => CommandError::InvalidInput(e.message),
                _ => CommandError::AuthenticationFailed {
                    tenant: tenant.clone(),
                    source: e,
                },
            })?;
        info!("authenticated against tenant {}", tenant);
        self.client.set_token(token);
        Ok(())
    }

    async fn ensure_auth(&mut self) -> CommandResult<()> {
        if !self.client.is_authenticated() {
            self.authenticate().await?;
        }
        Ok(())
    }

    // ── Virtual networks ─────────────────────────────────────────────

    pub async fn set_virtual_network(
        &mut self,
        mode: SetVirtualNetwork,
    ) -> CommandResult<VirtualNetwork> {
        self.ensure_auth().await?;
        virtual_network::set_virtual_network(&self.client, mode).await
    }

    pub async fn get_virtual_network(
        &mut self,
        query: GetVirtualNetwork,
    ) -> CommandResult<Outcome<VirtualNetwork>> {
        self.ensure_auth().await?;
        virtual_network::get_virtual_network(&self.client, query).await
    }

    /// Local mode never touches the network, so it needs no token.
    pub async fn add_subnet(
        &mut self,
        mode: AddSubnetMode,
        config: SubnetConfig,
    ) -> CommandResult<VirtualNetwork> {
        if matches!(mode, AddSubnetMode::ByResource { .. }) {
            self.ensure_auth().await?;
        }
        subnet::add_subnet(&self.client, mode, config).await
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Tokens are acquired per tenant by the subscription client itself.
    pub async fn get_subscription(
        &self,
        query: GetSubscription,
    ) -> CommandResult<Outcome<Subscription>> {
        subscription::get_subscription(&self.client, self.client.tenant_id(), query).await
    }

    // ── Recovery Services vaults ─────────────────────────────────────

    pub async fn get_vault(&mut self, query: GetVault) -> CommandResult<Outcome<RecoveryVault>> {
        self.ensure_auth().await?;
        vault::get_vault(&self.client, query).await
    }

    pub async fn remove_vault(&mut self, target: VaultTarget) -> CommandResult<VaultOperationOutput> {
        self.ensure_auth().await?;
        vault::remove_vault(&self.client, target).await
    }
}
