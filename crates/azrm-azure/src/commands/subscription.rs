//! `subscription get`.

use log::info;

use super::{not_found, Outcome};
use crate::models::Subscription;
use crate::resource_client::SubscriptionClient;
use crate::types::{AzureError, CommandError, CommandResult};

/// Invocation modes of `subscription get`. `tenant` defaults to the tenant
/// of the active credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetSubscription {
    ByName { name: String, tenant: Option<String> },
    ById { id: String, tenant: Option<String> },
    List { tenant: Option<String> },
}

impl GetSubscription {
    /// Pick a mode from optional filters: name wins over id, and with
    /// neither the full list is returned.
    pub fn from_filters(
        id: Option<String>,
        name: Option<String>,
        tenant: Option<String>,
    ) -> CommandResult<Self> {
        let tenant = tenant.filter(|t| !t.trim().is_empty());
        match (name, id) {
            (Some(name), _) if name.trim().is_empty() => Err(CommandError::InvalidInput(
                "subscription name must not be empty".into(),
            )),
            (Some(name), _) => Ok(GetSubscription::ByName { name, tenant }),
            (None, Some(id)) if id.trim().is_empty() => Err(CommandError::InvalidInput(
                "subscription id must not be empty".into(),
            )),
            (None, Some(id)) => Ok(GetSubscription::ById { id, tenant }),
            (None, None) => Ok(GetSubscription::List { tenant }),
        }
    }

    fn tenant(&self) -> Option<&str> {
        match self {
            GetSubscription::ByName { tenant, .. }
            | GetSubscription::ById { tenant, .. }
            | GetSubscription::List { tenant } => tenant.as_deref(),
        }
    }
}

fn tenant_scope(tenant: &str) -> String {
    format!("tenant '{}'", tenant)
}

/// Auth failures carry the tenant they were raised for; anything else is a
/// plain remote failure.
fn with_tenant(tenant: &str) -> impl Fn(AzureError) -> CommandError + '_ {
    move |e| {
        if e.is_auth_failure() {
            CommandError::AuthenticationFailed {
                tenant: tenant.to_string(),
                source: e,
            }
        } else {
            CommandError::RemoteCallFailed(e)
        }
    }
}

pub async fn get_subscription(
    client: &dyn SubscriptionClient,
    default_tenant: Option<&str>,
    query: GetSubscription,
) -> CommandResult<Outcome<Subscription>> {
    let tenant = query
        .tenant()
        .or(default_tenant)
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            CommandError::InvalidInput(
                "no tenant given and none configured for the active credentials".into(),
            )
        })?;

    match query {
        GetSubscription::ByName { name, .. } => {
            info!("subscription get (name): {} in {}", name, tenant);
            let all = client.list(&tenant).await.map_err(with_tenant(&tenant))?;
            let wanted = name.to_lowercase();
            let found = all
                .into_iter()
                .find(|s| s.display_name.to_lowercase() == wanted)
                .ok_or_else(|| not_found("Subscription", &name, tenant_scope(&tenant)))?;
            Ok(Outcome::One(Subscription::from(found)))
        }
        GetSubscription::ById { id, .. } => {
            info!("subscription get (id): {} in {}", id, tenant);
            let found = client
                .get(&tenant, &id)
                .await
                .map_err(with_tenant(&tenant))?
                .ok_or_else(|| not_found("Subscription", &id, tenant_scope(&tenant)))?;
            Ok(Outcome::One(Subscription::from(found)))
        }
        GetSubscription::List { .. } => {
            info!("subscription get (list) in {}", tenant);
            let all = client.list(&tenant).await.map_err(with_tenant(&tenant))?;
            Ok(Outcome::Many(all.into_iter().map(Subscription::from).collect()))
        }
    }
}
