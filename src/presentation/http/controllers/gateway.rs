// src/presentation/http/controllers/gateway.rs
use crate::presentation::http::error::{HttpResult, IntoHttpResult, upstream_response};
use crate::presentation::http::extractors::BearerToken;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension,
    extract::Query,
    http::{HeaderMap, header::USER_AGENT},
    response::{Redirect, Response},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RootParams {
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub nonce: Option<String>,
}

/// Which UI a browser landing on `/` is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiTarget {
    Web,
    Mobile,
}

/// Decide the UI for a landing request. An explicit `target` query parameter
/// wins; otherwise the User-Agent is sniffed for common mobile markers.
pub fn pick_ui_target(target: Option<&str>, user_agent: &str) -> UiTarget {
    match target {
        Some("mobile") => UiTarget::Mobile,
        Some("web") => UiTarget::Web,
        _ => {
            let ua = user_agent.to_ascii_lowercase();
            if ua.contains("mobile") || ua.contains("android") || ua.contains("iphone") {
                UiTarget::Mobile
            } else {
                UiTarget::Web
            }
        }
    }
}

pub async fn root(
    Extension(state): Extension<HttpState>,
    Query(params): Query<RootParams>,
    headers: HeaderMap,
) -> Redirect {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let gateway = &state.services.gateway;
    let destination = match pick_ui_target(params.target.as_deref(), user_agent) {
        UiTarget::Web => gateway.web_ui_url(),
        UiTarget::Mobile => gateway.mobile_ui_url(),
    };

    Redirect::temporary(destination)
}

pub async fn login(
    Extension(state): Extension<HttpState>,
    Query(params): Query<LoginParams>,
) -> HttpResult<Response> {
    state
        .services
        .gateway
        .login(params.redirect_uri.as_deref())
        .await
        .into_http()
        .map(upstream_response)
}

pub async fn callback(
    Extension(state): Extension<HttpState>,
    Query(params): Query<CallbackParams>,
) -> HttpResult<Response> {
    state
        .services
        .gateway
        .authenticate(&params.code, params.state.as_deref(), params.nonce.as_deref())
        .await
        .into_http()
        .map(upstream_response)
}

pub async fn me(
    Extension(state): Extension<HttpState>,
    BearerToken(token): BearerToken,
) -> HttpResult<Response> {
    state
        .services
        .gateway
        .userinfo(&token)
        .await
        .into_http()
        .map(upstream_response)
}
