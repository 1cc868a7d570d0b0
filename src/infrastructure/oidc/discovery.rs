// src/infrastructure/oidc/discovery.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;

/// Subset of the OpenID Connect discovery document this service relies on.
/// Unknown fields in the document are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMetadata {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: Option<String>,
}

/// Fetches the IdP discovery document on first use and keeps it for the
/// lifetime of the process. There is no TTL: IdP metadata changes by
/// redeploying this service.
pub struct DiscoveryCache {
    http: reqwest::Client,
    issuer: String,
    timeout: Duration,
    cached: Mutex<Option<ProviderMetadata>>,
}

impl DiscoveryCache {
    pub fn new(http: reqwest::Client, issuer: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            issuer: issuer.into(),
            timeout,
            cached: Mutex::new(None),
        }
    }

    pub fn discovery_url(&self) -> String {
        format!(
            "{}/.well-known/openid-configuration",
            self.issuer.trim_end_matches('/')
        )
    }

    /// Return the provider metadata, fetching it on first use. The lock is
    /// held across the fetch so concurrent first callers share a single
    /// request, and a failed fetch leaves the cache empty for the next call.
    pub async fn get(&self) -> ApplicationResult<ProviderMetadata> {
        let mut cached = self.cached.lock().await;
        if let Some(metadata) = cached.as_ref() {
            return Ok(metadata.clone());
        }

        let metadata = self.fetch().await?;
        *cached = Some(metadata.clone());
        Ok(metadata)
    }

    async fn fetch(&self) -> ApplicationResult<ProviderMetadata> {
        let url = self.discovery_url();
        tracing::debug!(%url, "fetching oidc discovery document");

        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "discovery request failed");
                ApplicationError::discovery(format!("discovery request to {url} failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "discovery endpoint returned an error");
            return Err(ApplicationError::discovery(format!(
                "discovery endpoint {url} returned HTTP {status}"
            )));
        }

        response.json::<ProviderMetadata>().await.map_err(|err| {
            ApplicationError::discovery(format!("invalid discovery document from {url}: {err}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn cache_for(issuer: &str) -> DiscoveryCache {
        DiscoveryCache::new(reqwest::Client::new(), issuer, Duration::from_secs(5))
    }

    #[test]
    fn discovery_url_appends_well_known_path() {
        let cache = cache_for("https://idp.example.net");
        assert_eq!(
            cache.discovery_url(),
            "https://idp.example.net/.well-known/openid-configuration"
        );
    }

    #[test]
    fn discovery_url_trims_trailing_slashes() {
        let cache = cache_for("https://idp.example.net///");
        assert_eq!(
            cache.discovery_url(),
            "https://idp.example.net/.well-known/openid-configuration"
        );
    }

    #[test]
    fn metadata_parses_without_userinfo_endpoint() {
        let metadata: ProviderMetadata = serde_json::from_value(json!({
            "authorization_endpoint": "https://idp.example.net/authorize",
            "token_endpoint": "https://idp.example.net/token",
        }))
        .unwrap();
        assert!(metadata.userinfo_endpoint.is_none());
    }

    #[test]
    fn metadata_ignores_unknown_fields() {
        let metadata: ProviderMetadata = serde_json::from_value(json!({
            "issuer": "https://idp.example.net",
            "authorization_endpoint": "https://idp.example.net/authorize",
            "token_endpoint": "https://idp.example.net/token",
            "userinfo_endpoint": "https://idp.example.net/userinfo",
            "jwks_uri": "https://idp.example.net/jwks",
            "scopes_supported": ["openid", "profile", "email"],
        }))
        .unwrap();
        assert_eq!(
            metadata.userinfo_endpoint.as_deref(),
            Some("https://idp.example.net/userinfo")
        );
    }
}
