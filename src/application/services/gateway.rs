// src/application/services/gateway.rs
use crate::application::{
    dto::UpstreamReply,
    error::{ApplicationError, ApplicationResult},
};
use bytes::Bytes;
use reqwest::{
    Method,
    header::{
        ACCEPT_ENCODING, AUTHORIZATION, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, HOST, HeaderMap,
        HeaderName, TRANSFER_ENCODING,
    },
};
use serde_json::json;
use std::time::Duration;

/// Where the gateway sends traffic: the auth service for credential work,
/// the backend for everything under `/api`, and the UI URLs for the root
/// redirect.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub auth_base_url: String,
    pub backend_base_url: String,
    pub callback_url: String,
    pub web_ui_url: String,
    pub mobile_ui_url: String,
    pub auth_timeout: Duration,
    pub proxy_timeout: Duration,
}

pub struct ProxyCommand {
    pub method: Method,
    /// Sub-path below `/api`, still percent-encoded, with its leading slash.
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub access_token: String,
}

/// Delegates credential operations to the auth service and forwards `/api`
/// traffic to the backend, mirroring upstream replies in both directions.
pub struct GatewayService {
    http: reqwest::Client,
    settings: GatewaySettings,
}

// Dropped from forwarded requests: recomputed or re-set on the outbound
// side, hop-by-hop, or replaced with the validated bearer. Content-Type is
// set again only when a JSON body is actually forwarded.
const STRIPPED_REQUEST_HEADERS: [HeaderName; 7] = [
    HOST,
    CONTENT_LENGTH,
    CONTENT_TYPE,
    TRANSFER_ENCODING,
    CONNECTION,
    ACCEPT_ENCODING,
    AUTHORIZATION,
];

fn forwardable_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if STRIPPED_REQUEST_HEADERS.iter().any(|s| s == name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

impl GatewayService {
    pub fn new(http: reqwest::Client, mut settings: GatewaySettings) -> Self {
        settings.auth_base_url = settings.auth_base_url.trim_end_matches('/').to_string();
        settings.backend_base_url = settings.backend_base_url.trim_end_matches('/').to_string();
        Self { http, settings }
    }

    /// The gateway's own callback endpoint, used as the default redirect URI
    /// for both legs of the login flow.
    pub fn callback_url(&self) -> &str {
        &self.settings.callback_url
    }

    pub fn web_ui_url(&self) -> &str {
        &self.settings.web_ui_url
    }

    pub fn mobile_ui_url(&self) -> &str {
        &self.settings.mobile_ui_url
    }

    /// Ask the auth service for an authorization URL.
    pub async fn login(&self, redirect_uri: Option<&str>) -> ApplicationResult<UpstreamReply> {
        let redirect = redirect_uri.unwrap_or(self.callback_url());
        let request = self
            .http
            .get(format!("{}/auth/authorize", self.settings.auth_base_url))
            .query(&[("redirect_uri", redirect)])
            .timeout(self.settings.auth_timeout);

        self.relay(request, "auth service").await
    }

    /// Exchange the callback code via the auth service, binding the redirect
    /// URI to the same callback URL the authorize leg used.
    pub async fn authenticate(
        &self,
        code: &str,
        state: Option<&str>,
        nonce: Option<&str>,
    ) -> ApplicationResult<UpstreamReply> {
        let payload = json!({
            "code": code,
            "redirect_uri": self.callback_url(),
            "state": state,
            "nonce": nonce,
        });
        let request = self
            .http
            .post(format!("{}/authenticate", self.settings.auth_base_url))
            .json(&payload)
            .timeout(self.settings.auth_timeout);

        self.relay(request, "auth service").await
    }

    /// Fetch userinfo claims for the caller's bearer token.
    pub async fn userinfo(&self, access_token: &str) -> ApplicationResult<UpstreamReply> {
        let request = self
            .http
            .get(format!("{}/userinfo", self.settings.auth_base_url))
            .bearer_auth(access_token)
            .timeout(self.settings.auth_timeout);

        self.relay(request, "auth service").await
    }

    /// Forward a request to the backend. Inbound headers travel along minus
    /// the stripped set; `Authorization` always carries the validated
    /// bearer. The reply is mirrored whatever its status, as JSON when the
    /// backend says JSON and as plain text otherwise.
    pub async fn proxy(&self, command: ProxyCommand) -> ApplicationResult<UpstreamReply> {
        let mut url = format!("{}{}", self.settings.backend_base_url, command.path);
        if let Some(query) = command.query.as_deref().filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }

        let mut request = self
            .http
            .request(command.method, url)
            .headers(forwardable_headers(&command.headers))
            .bearer_auth(&command.access_token)
            .timeout(self.settings.proxy_timeout);

        // Bodies that do not parse as JSON are dropped, not forwarded raw.
        if serde_json::from_slice::<serde_json::Value>(&command.body).is_ok() {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(command.body);
        }

        let response = request.send().await.map_err(|err| {
            tracing::warn!(error = %err, "backend request failed");
            ApplicationError::upstream_unreachable(format!("backend request failed: {err}"))
        })?;

        let reply = UpstreamReply::read(response).await.map_err(|err| {
            ApplicationError::upstream_unreachable(format!("reading backend reply failed: {err}"))
        })?;

        let content_type = if reply.is_json() {
            "application/json"
        } else {
            "text/plain; charset=utf-8"
        };
        Ok(UpstreamReply {
            content_type: Some(content_type.to_string()),
            ..reply
        })
    }

    /// Send a delegated request and capture the reply. Success statuses come
    /// back as a reply to re-emit; anything else is surfaced as an
    /// `Upstream` error carrying the same status and body.
    async fn relay(
        &self,
        request: reqwest::RequestBuilder,
        upstream: &str,
    ) -> ApplicationResult<UpstreamReply> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!(error = %err, "{upstream} request failed");
            ApplicationError::upstream_unreachable(format!("{upstream} request failed: {err}"))
        })?;

        let reply = UpstreamReply::read(response).await.map_err(|err| {
            ApplicationError::upstream_unreachable(format!(
                "reading {upstream} reply failed: {err}"
            ))
        })?;

        if reply.status.is_success() {
            Ok(reply)
        } else {
            Err(ApplicationError::Upstream {
                status: reply.status,
                body: reply.body,
                content_type: reply.content_type,
            })
        }
    }
}
