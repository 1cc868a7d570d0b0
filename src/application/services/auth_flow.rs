// src/application/services/auth_flow.rs
use crate::{
    application::{dto::AuthorizeUrlDto, error::ApplicationResult},
    infrastructure::oidc::{OidcClientFactory, client::random_url_safe},
};
use serde_json::Value;
use std::sync::Arc;

pub struct AuthorizeCommand {
    pub redirect_uri: String,
    pub state: Option<String>,
    pub nonce: Option<String>,
}

pub struct ExchangeCodeCommand {
    pub code: String,
    pub redirect_uri: String,
    pub state: Option<String>,
    pub nonce: Option<String>,
}

/// The OIDC authorization-code flow, one operation per leg. Every call
/// builds a fresh client bound to the redirect URI it concerns.
pub struct AuthFlowService {
    clients: Arc<OidcClientFactory>,
}

impl AuthFlowService {
    pub fn new(clients: Arc<OidcClientFactory>) -> Self {
        Self { clients }
    }

    /// Build the IdP authorization URL for the given redirect URI. Missing
    /// `state` and `nonce` are filled with fresh random values; both are
    /// returned so the caller can keep them for the callback leg.
    pub async fn authorize(&self, command: AuthorizeCommand) -> ApplicationResult<AuthorizeUrlDto> {
        let state = command.state.unwrap_or_else(random_url_safe);
        let nonce = command.nonce.unwrap_or_else(random_url_safe);

        let client = self.clients.build(Some(&command.redirect_uri)).await?;
        let authorize_url = client.authorize_url(&state, &nonce)?;

        Ok(AuthorizeUrlDto {
            authorize_url,
            state,
            nonce,
        })
    }

    /// Exchange an authorization code for the IdP token response, which is
    /// returned verbatim. `state` and `nonce` are accepted for interface
    /// parity but not compared here; the session layer above owns that
    /// check.
    pub async fn exchange_code(&self, command: ExchangeCodeCommand) -> ApplicationResult<Value> {
        let client = self.clients.build(Some(&command.redirect_uri)).await?;
        client.exchange_code(&command.code).await
    }

    /// Fetch userinfo claims for the access token, verbatim. Fails with
    /// `UserinfoUnsupported` when the IdP advertises no userinfo endpoint.
    pub async fn userinfo(&self, access_token: &str) -> ApplicationResult<Value> {
        let client = self.clients.build(None).await?;
        client.userinfo(access_token).await
    }
}
