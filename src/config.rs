// src/config.rs
use std::{env, time::Duration};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    oidc_issuer: String,
    oidc_client_id: String,
    oidc_client_secret: String,
    oidc_redirect_uri_base: String,
    auth_listen_addr: String,
    gateway_listen_addr: String,
    auth_base_url: String,
    backend_base_url: String,
    auth_callback_url: String,
    web_ui_url: String,
    mobile_ui_url: String,
    upstream_timeout: Duration,
    proxy_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_oidc_issuer() -> String {
    "https://accounts.google.com".into()
}

fn default_redirect_uri_base() -> String {
    "http://localhost:8083".into()
}

fn default_auth_listen_addr() -> String {
    "127.0.0.1:8083".into()
}

fn default_gateway_listen_addr() -> String {
    "127.0.0.1:8084".into()
}

fn default_auth_base_url() -> String {
    "http://localhost:8083".into()
}

fn default_backend_base_url() -> String {
    "http://localhost:8080".into()
}

fn default_auth_callback_url() -> String {
    "http://localhost:8084/auth/callback".into()
}

fn default_web_ui_url() -> String {
    "http://localhost:8000".into()
}

fn default_mobile_ui_url() -> String {
    "http://localhost:8000/m".into()
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

fn default_proxy_timeout_secs() -> u64 {
    15
}

impl AppConfig {
    /// Build configuration from environment variables. Uses sensible defaults
    /// for optional values and validates required keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();

        let oidc_issuer = env::var("OIDC_ISSUER").unwrap_or_else(|_| default_oidc_issuer());
        let oidc_client_id =
            env::var("OIDC_CLIENT_ID").map_err(|_| ConfigError::Missing("OIDC_CLIENT_ID"))?;
        let oidc_client_secret = env::var("OIDC_CLIENT_SECRET")
            .map_err(|_| ConfigError::Missing("OIDC_CLIENT_SECRET"))?;

        if oidc_client_id.trim().is_empty() {
            return Err(ConfigError::Invalid("OIDC_CLIENT_ID must not be empty".into()));
        }
        if oidc_client_secret.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "OIDC_CLIENT_SECRET must not be empty".into(),
            ));
        }

        let oidc_redirect_uri_base =
            env::var("OIDC_REDIRECT_URI_BASE").unwrap_or_else(|_| default_redirect_uri_base());
        let auth_listen_addr =
            env::var("AUTH_LISTEN_ADDR").unwrap_or_else(|_| default_auth_listen_addr());
        let gateway_listen_addr =
            env::var("GATEWAY_LISTEN_ADDR").unwrap_or_else(|_| default_gateway_listen_addr());
        let auth_base_url = env::var("AUTH_BASE_URL").unwrap_or_else(|_| default_auth_base_url());
        let backend_base_url =
            env::var("BACKEND_BASE_URL").unwrap_or_else(|_| default_backend_base_url());
        let auth_callback_url =
            env::var("AUTH_CALLBACK_URL").unwrap_or_else(|_| default_auth_callback_url());
        let web_ui_url = env::var("WEB_UI_URL").unwrap_or_else(|_| default_web_ui_url());
        let mobile_ui_url = env::var("MOBILE_UI_URL").unwrap_or_else(|_| default_mobile_ui_url());

        let upstream_timeout_secs = env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or_else(default_upstream_timeout_secs);

        let proxy_timeout_secs = env::var("PROXY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or_else(default_proxy_timeout_secs);

        Ok(Self {
            oidc_issuer,
            oidc_client_id,
            oidc_client_secret,
            oidc_redirect_uri_base,
            auth_listen_addr,
            gateway_listen_addr,
            auth_base_url,
            backend_base_url,
            auth_callback_url,
            web_ui_url,
            mobile_ui_url,
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            proxy_timeout: Duration::from_secs(proxy_timeout_secs),
        })
    }

    pub fn oidc_issuer(&self) -> &str {
        &self.oidc_issuer
    }

    pub fn oidc_client_id(&self) -> &str {
        &self.oidc_client_id
    }

    pub fn oidc_client_secret(&self) -> &str {
        &self.oidc_client_secret
    }

    pub fn oidc_redirect_uri_base(&self) -> &str {
        &self.oidc_redirect_uri_base
    }

    pub fn auth_listen_addr(&self) -> &str {
        &self.auth_listen_addr
    }

    pub fn gateway_listen_addr(&self) -> &str {
        &self.gateway_listen_addr
    }

    /// Base URL the gateway uses to reach the auth service.
    pub fn auth_base_url(&self) -> &str {
        &self.auth_base_url
    }

    pub fn backend_base_url(&self) -> &str {
        &self.backend_base_url
    }

    /// Where the IdP sends the user back; also the default redirect URI the
    /// gateway hands to the auth service on login.
    pub fn auth_callback_url(&self) -> &str {
        &self.auth_callback_url
    }

    pub fn web_ui_url(&self) -> &str {
        &self.web_ui_url
    }

    pub fn mobile_ui_url(&self) -> &str {
        &self.mobile_ui_url
    }

    /// Deadline for discovery, token and userinfo calls against the IdP and
    /// for gateway requests to the auth service.
    pub fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout
    }

    /// Deadline for gateway requests forwarded to the backend.
    pub fn proxy_timeout(&self) -> Duration {
        self.proxy_timeout
    }
}
