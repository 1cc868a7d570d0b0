// src/infrastructure/oidc/client.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::infrastructure::oidc::discovery::{DiscoveryCache, ProviderMetadata};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use std::{sync::Arc, time::Duration};
use url::Url;

/// Scope requested from the IdP on every authorization.
pub const OIDC_SCOPE: &str = "openid profile email";

/// Static relying-party credentials and the issuer they belong to.
#[derive(Debug, Clone)]
pub struct OidcSettings {
    pub issuer: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri_base: String,
}

/// Random URL-safe value with 32 bytes of entropy, used for `state` and
/// `nonce` defaults.
pub fn random_url_safe() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Per-request view of the relying party: the discovery endpoints plus the
/// redirect URI this request is bound to. Cheap to build, never shared
/// between requests.
#[derive(Debug, Clone)]
pub struct OidcClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    metadata: ProviderMetadata,
    timeout: Duration,
}

impl OidcClient {
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// The advertised userinfo endpoint, treating an empty string the same
    /// as an absent one.
    pub fn userinfo_endpoint(&self) -> Option<&str> {
        self.metadata
            .userinfo_endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.is_empty())
    }

    /// Build the authorization URL the user agent should be redirected to.
    pub fn authorize_url(&self, state: &str, nonce: &str) -> ApplicationResult<String> {
        let mut url = Url::parse(&self.metadata.authorization_endpoint).map_err(|err| {
            ApplicationError::discovery(format!("invalid authorization endpoint: {err}"))
        })?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", OIDC_SCOPE)
            .append_pair("state", state)
            .append_pair("nonce", nonce);
        Ok(url.into())
    }

    /// POST the authorization code to the token endpoint using HTTP Basic
    /// client authentication. The token response is passed through as-is.
    pub async fn exchange_code(&self, code: &str) -> ApplicationResult<serde_json::Value> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(&self.metadata.token_endpoint)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| {
                ApplicationError::token_exchange(format!("token endpoint request failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "token endpoint rejected the authorization code");
            return Err(ApplicationError::token_exchange(format!(
                "token endpoint returned HTTP {status}: {body}"
            )));
        }

        response.json().await.map_err(|err| {
            ApplicationError::token_exchange(format!("invalid token response: {err}"))
        })
    }

    /// GET the userinfo endpoint with the access token as a bearer
    /// credential. Claims are passed through as-is.
    pub async fn userinfo(&self, access_token: &str) -> ApplicationResult<serde_json::Value> {
        let endpoint = self
            .userinfo_endpoint()
            .ok_or(ApplicationError::UserinfoUnsupported)?
            .to_string();

        let response = self
            .http
            .get(&endpoint)
            .bearer_auth(access_token)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| {
                ApplicationError::userinfo_failed(format!("userinfo request failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "userinfo endpoint rejected the access token");
            return Err(ApplicationError::userinfo_failed(format!(
                "userinfo endpoint returned HTTP {status}: {body}"
            )));
        }

        response.json().await.map_err(|err| {
            ApplicationError::userinfo_failed(format!("invalid userinfo response: {err}"))
        })
    }
}

/// Builds per-request [`OidcClient`] values from the static relying-party
/// settings plus the cached discovery document.
pub struct OidcClientFactory {
    http: reqwest::Client,
    settings: OidcSettings,
    discovery: Arc<DiscoveryCache>,
    timeout: Duration,
}

impl OidcClientFactory {
    pub fn new(
        http: reqwest::Client,
        settings: OidcSettings,
        discovery: Arc<DiscoveryCache>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            settings,
            discovery,
            timeout,
        }
    }

    /// Redirect URI used when the caller does not supply one.
    pub fn default_redirect_uri(&self) -> String {
        format!(
            "{}/callback",
            self.settings.redirect_uri_base.trim_end_matches('/')
        )
    }

    /// Build a client bound to `redirect_uri`, falling back to
    /// `{redirect_uri_base}/callback`. Discovery errors propagate; nothing
    /// is cached on failure.
    pub async fn build(&self, redirect_uri: Option<&str>) -> ApplicationResult<OidcClient> {
        let metadata = self.discovery.get().await?;
        let redirect_uri = match redirect_uri {
            Some(uri) => uri.to_string(),
            None => self.default_redirect_uri(),
        };

        Ok(OidcClient {
            http: self.http.clone(),
            client_id: self.settings.client_id.clone(),
            client_secret: self.settings.client_secret.clone(),
            redirect_uri,
            metadata,
            timeout: self.timeout,
        })
    }
}
