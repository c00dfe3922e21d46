//! HTTP client wrapper for the Azure Resource Manager API.
//!
//! Handles bearer-token injection, optional retries for throttling and 5xx
//! responses, pagination via `nextLink`, and ARM error extraction.

use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use crate::types::{
    ArmList, AzureConfig, AzureCredentials, AzureError, AzureErrorKind, AzureResult, AzureToken,
};

/// Base delay between transport retries (doubled each attempt).
const BASE_DELAY_MS: u64 = 500;

/// HTTP client with Azure-specific auth handling.
#[derive(Clone)]
pub struct AzureClient {
    http: Client,
    token: Option<AzureToken>,
    credentials: Option<AzureCredentials>,
    config: AzureConfig,
}

impl AzureClient {
    pub fn new(config: AzureConfig) -> AzureResult<Self> {
        for endpoint in [&config.management_endpoint, &config.login_endpoint] {
            Url::parse(endpoint).map_err(|e| {
                AzureError::validation(format!("Invalid endpoint '{endpoint}': {e}"))
            })?;
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Ok(Self {
            http,
            token: None,
            credentials: None,
            config,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &AzureConfig {
        &self.config
    }

    pub fn set_credentials(&mut self, creds: AzureCredentials) {
        self.credentials = Some(creds);
    }

    pub fn credentials(&self) -> Option<&AzureCredentials> {
        self.credentials.as_ref()
    }

    pub fn set_token(&mut self, token: AzureToken) {
        self.token = Some(token);
    }

    pub fn token(&self) -> Option<&AzureToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .as_ref()
            .map(|t| !t.access_token.is_empty() && !t.is_expired())
            .unwrap_or(false)
    }

    /// Tenant of the active credentials.
    pub fn tenant_id(&self) -> Option<&str> {
        self.credentials
            .as_ref()
            .map(|c| c.tenant_id.as_str())
            .filter(|t| !t.is_empty())
    }

    pub fn subscription_id(&self) -> AzureResult<&str> {
        self.credentials
            .as_ref()
            .map(|c| c.subscription_id.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(AzureError::subscription_not_set)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Management-plane URL: `{endpoint}{path}`.
    pub fn arm_url(&self, path: &str) -> String {
        format!("{}{}", self.config.management_endpoint.trim_end_matches('/'), path)
    }

    /// Subscription-scoped URL.
    pub fn subscription_url(&self, suffix: &str) -> AzureResult<String> {
        let sub = self.subscription_id()?;
        Ok(self.arm_url(&format!("/subscriptions/{}{}", sub, suffix)))
    }

    /// Resource-group-scoped URL.
    pub fn resource_group_url(&self, rg: &str, suffix: &str) -> AzureResult<String> {
        let sub = self.subscription_id()?;
        Ok(self.arm_url(&format!(
            "/subscriptions/{}/resourceGroups/{}{}",
            sub, rg, suffix
        )))
    }

    // ── Auth header builder ──────────────────────────────────────────

    fn auth_headers(&self) -> AzureResult<HeaderMap> {
        let token = self
            .token
            .as_ref()
            .filter(|t| !t.access_token.is_empty())
            .ok_or_else(AzureError::not_authenticated)?;
        if token.is_expired() {
            return Err(AzureError::new(AzureErrorKind::Auth, "Access token has expired"));
        }

        let mut headers = HeaderMap::new();
        let val = format!("Bearer {}", token.access_token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&val).map_err(|e| {
                AzureError::new(AzureErrorKind::Auth, format!("Header value error: {e}"))
            })?,
        );
        Ok(headers)
    }

    // ── Core HTTP verbs ──────────────────────────────────────────────

    /// Send an authenticated request, retrying throttled / 5xx responses up
    /// to `config.max_retries` times. Non-2xx responses become errors.
    async fn send<F>(&self, verb: &str, url: &str, build: F) -> AzureResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let headers = self.auth_headers()?;
        let mut attempt: u32 = 0;

        loop {
            debug!("Azure {} {}", verb, url);
            let resp = build(&self.http)
                .headers(headers.clone())
                .send()
                .await
                .map_err(transport_error)?;

            let status = resp.status();
            if status.is_success() {
                return Ok(resp);
            }

            if should_retry(status.as_u16()) && attempt < self.config.max_retries {
                let delay = BASE_DELAY_MS * 2u64.pow(attempt);
                warn!("Azure {} {} → {} – retrying in {}ms", verb, url, status, delay);
                tokio::time::sleep(Duration::from_millis(delay)).await;
                attempt += 1;
                continue;
            }

            let body = resp.text().await.unwrap_or_default();
            return Err(AzureError::from_status(status.as_u16(), &body));
        }
    }

    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> AzureResult<T> {
        let resp = self.send("GET", url, |http| http.get(url)).await?;
        parse_json(resp).await
    }

    /// GET that maps a 404 to `Ok(None)`.
    pub async fn get_optional<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> AzureResult<Option<T>> {
        match self.get_json(url).await {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.kind == AzureErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn put_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> AzureResult<T> {
        let resp = self.send("PUT", url, |http| http.put(url).json(body)).await?;
        parse_json(resp).await
    }

    /// DELETE returning the (successful) status code: 200, 202 or 204.
    pub async fn delete(&self, url: &str) -> AzureResult<u16> {
        let resp = self.send("DELETE", url, |http| http.delete(url)).await?;
        Ok(resp.status().as_u16())
    }

    // ── Pagination helper ────────────────────────────────────────────

    /// Follow `nextLink` to collect **all** items from a paginated list endpoint.
    pub async fn get_all_pages<T: serde::de::DeserializeOwned + Default>(
        &self,
        initial_url: &str,
    ) -> AzureResult<Vec<T>> {
        let mut all: Vec<T> = Vec::new();
        let mut url = initial_url.to_string();

        loop {
            debug!("Azure paginate: {}", url);
            let page: ArmList<T> = self.get_json(&url).await?;
            all.extend(page.value);
            match page.next_link {
                Some(next) if !next.is_empty() => url = next,
                _ => break,
            }
        }

        Ok(all)
    }

    /// POST unauthenticated form data (token exchange).
    pub async fn post_form_unauthenticated<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> AzureResult<T> {
        let resp = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(transport_error)?;

        if resp.status().is_success() {
            parse_json(resp).await
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(AzureError::from_status(status, &body))
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn parse_json<T: serde::de::DeserializeOwned>(resp: Response) -> AzureResult<T> {
    resp.json::<T>()
        .await
        .map_err(|e| AzureError::new(AzureErrorKind::Parse, format!("JSON parse: {e}")))
}

fn transport_error(e: reqwest::Error) -> AzureError {
    if e.is_timeout() {
        AzureError::new(AzureErrorKind::Timeout, format!("{e}"))
    } else {
        AzureError::new(AzureErrorKind::Network, format!("{e}"))
    }
}

fn should_retry(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_sub(sub: &str) -> AzureClient {
        let mut c = AzureClient::new(AzureConfig::new()).unwrap();
        c.set_credentials(AzureCredentials {
            subscription_id: sub.into(),
            tenant_id: "t1".into(),
            ..Default::default()
        });
        c
    }

    #[test]
    fn new_client_default() {
        let c = AzureClient::new(AzureConfig::new()).unwrap();
        assert!(!c.is_authenticated());
        assert!(c.credentials().is_none());
        assert!(c.token().is_none());
        assert!(c.tenant_id().is_none());
    }

    #[test]
    fn invalid_endpoint_rejected() {
        let config = AzureConfig {
            management_endpoint: "not a url".into(),
            ..AzureConfig::new()
        };
        let err = AzureClient::new(config).err().unwrap();
        assert_eq!(err.kind, AzureErrorKind::Validation);
    }

    #[test]
    fn set_token_authenticates() {
        let mut c = AzureClient::new(AzureConfig::new()).unwrap();
        c.set_token(AzureToken {
            access_token: "abc".into(),
            token_type: "Bearer".into(),
            expires_at: Some(chrono::Utc::now() + chrono::Duration::hours(1)),
            tenant_id: None,
        });
        assert!(c.is_authenticated());
    }

    #[test]
    fn expired_token_not_authenticated() {
        let mut c = AzureClient::new(AzureConfig::new()).unwrap();
        c.set_token(AzureToken {
            access_token: "abc".into(),
            token_type: "Bearer".into(),
            expires_at: Some(chrono::Utc::now() - chrono::Duration::hours(1)),
            tenant_id: None,
        });
        assert!(!c.is_authenticated());
        assert_eq!(c.auth_headers().unwrap_err().kind, AzureErrorKind::Auth);
    }

    #[test]
    fn missing_token_is_not_authenticated_error() {
        let c = client_with_sub("s1");
        assert_eq!(
            c.auth_headers().unwrap_err().kind,
            AzureErrorKind::NotAuthenticated
        );
    }

    #[test]
    fn subscription_id_missing() {
        let c = AzureClient::new(AzureConfig::new()).unwrap();
        assert_eq!(
            c.subscription_id().unwrap_err().kind,
            AzureErrorKind::SubscriptionNotSet
        );
    }

    #[test]
    fn arm_url_uses_configured_endpoint() {
        let config = AzureConfig {
            management_endpoint: "https://management.usgovcloudapi.net/".into(),
            ..AzureConfig::new()
        };
        let c = AzureClient::new(config).unwrap();
        assert_eq!(
            c.arm_url("/subscriptions?api-version=x"),
            "https://management.usgovcloudapi.net/subscriptions?api-version=x"
        );
    }

    #[test]
    fn resource_group_url_construction() {
        let c = client_with_sub("sub1");
        let url = c
            .resource_group_url("rg1", "/providers/Microsoft.Network/virtualNetworks")
            .unwrap();
        assert_eq!(
            url,
            "https://management.azure.com/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.Network/virtualNetworks"
        );
    }

    #[test]
    fn should_retry_logic() {
        assert!(should_retry(429));
        assert!(should_retry(500));
        assert!(should_retry(503));
        assert!(!should_retry(400));
        assert!(!should_retry(401));
        assert!(!should_retry(404));
    }

    #[tokio::test]
    async fn calls_without_token_fail_before_network() {
        let c = client_with_sub("s1");
        let url = c.subscription_url("/resourcegroups").unwrap();
        let err = c.get_json::<serde_json::Value>(&url).await.unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::NotAuthenticated);
        let err = c.delete(&url).await.unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::NotAuthenticated);
    }
}
