// src/presentation/http/controllers/proxy.rs
use crate::application::services::gateway::ProxyCommand;
use crate::presentation::http::error::{HttpResult, IntoHttpResult, upstream_response};
use crate::presentation::http::extractors::BearerToken;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension,
    http::{HeaderMap, Method, Uri},
    response::Response,
};
use bytes::Bytes;

/// Relay an `/api/*` request to the backend under the caller's bearer token.
///
/// The sub-path and query string are taken from the raw request URI rather
/// than a path capture, so percent-encoding reaches the backend untouched.
pub async fn forward(
    Extension(state): Extension<HttpState>,
    BearerToken(token): BearerToken,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<Response> {
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(uri.path())
        .to_string();

    let command = ProxyCommand {
        method,
        path,
        query: uri.query().map(str::to_string),
        headers,
        body,
        access_token: token,
    };

    state
        .services
        .gateway
        .proxy(command)
        .await
        .into_http()
        .map(upstream_response)
}
