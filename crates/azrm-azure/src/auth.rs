//! Azure AD OAuth2 authentication.
//!
//! Client-credentials (service-principal) flow against the Microsoft
//! Identity Platform v2.0 token endpoint.

use chrono::{Duration, Utc};
use log::debug;

use crate::client::AzureClient;
use crate::types::{AzureCredentials, AzureError, AzureResult, AzureToken, TokenResponse};

/// Token endpoint URL for a given tenant.
fn token_url(login_endpoint: &str, tenant_id: &str) -> String {
    format!(
        "{}/{}/oauth2/v2.0/token",
        login_endpoint.trim_end_matches('/'),
        tenant_id
    )
}

/// Acquire a management-plane token for `tenant_id` using the service
/// principal in `creds`.
pub async fn acquire_token(
    client: &AzureClient,
    creds: &AzureCredentials,
    tenant_id: &str,
) -> AzureResult<AzureToken> {
    if creds.client_id.is_empty() || creds.client_secret.is_empty() || tenant_id.is_empty() {
        return Err(AzureError::validation(
            "client_id, client_secret, and tenant_id are all required",
        ));
    }

    let url = token_url(&client.config().login_endpoint, tenant_id);
    debug!("Azure token request → {}", url);

    let scope = client.config().management_scope();
    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", creds.client_id.as_str()),
        ("client_secret", creds.client_secret.as_str()),
        ("scope", scope.as_str()),
    ];

    let resp: TokenResponse = client.post_form_unauthenticated(&url, &form).await?;
    Ok(token_from_response(resp, tenant_id))
}

/// Convert the raw token endpoint response into an `AzureToken`.
fn token_from_response(resp: TokenResponse, tenant_id: &str) -> AzureToken {
    let expires_at = resp
        .expires_in
        .map(|secs| Utc::now() + Duration::seconds(secs as i64));

    AzureToken {
        access_token: resp.access_token,
        token_type: resp.token_type,
        expires_at,
        tenant_id: Some(tenant_id.to_string()),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AzureConfig, AzureErrorKind};

    #[test]
    fn token_url_construction() {
        let url = token_url("https://login.microsoftonline.com/", "my-tenant-123");
        assert_eq!(
            url,
            "https://login.microsoftonline.com/my-tenant-123/oauth2/v2.0/token"
        );
    }

    #[test]
    fn token_from_response_with_expiry() {
        let resp = TokenResponse {
            access_token: "tok123".into(),
            token_type: "Bearer".into(),
            expires_in: Some(3600),
        };
        let t = token_from_response(resp, "T1");
        assert_eq!(t.access_token, "tok123");
        assert!(t.expires_at.is_some());
        assert!(!t.is_expired());
        assert_eq!(t.tenant_id.as_deref(), Some("T1"));
    }

    #[test]
    fn token_from_response_no_expiry() {
        let resp = TokenResponse {
            access_token: "x".into(),
            token_type: "Bearer".into(),
            expires_in: None,
        };
        let t = token_from_response(resp, "T1");
        assert!(t.expires_at.is_none());
        assert!(!t.is_expired());
    }

    #[tokio::test]
    async fn acquire_token_validation() {
        let client = AzureClient::new(AzureConfig::new()).unwrap();
        let creds = AzureCredentials::default();
        let e = acquire_token(&client, &creds, "T1").await.unwrap_err();
        assert_eq!(e.kind, AzureErrorKind::Validation);
    }
}
