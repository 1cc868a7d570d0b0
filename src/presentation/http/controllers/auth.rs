// src/presentation/http/controllers/auth.rs
use crate::application::{
    dto::AuthorizeUrlDto,
    services::auth_flow::{AuthorizeCommand, ExchangeCodeCommand},
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::BearerToken;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Query};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct AuthorizeParams {
    pub redirect_uri: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub nonce: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthenticateRequest {
    pub code: String,
    pub redirect_uri: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub nonce: Option<String>,
}

pub async fn authorize(
    Extension(state): Extension<HttpState>,
    Query(params): Query<AuthorizeParams>,
) -> HttpResult<Json<AuthorizeUrlDto>> {
    let command = AuthorizeCommand {
        redirect_uri: params.redirect_uri,
        state: params.state,
        nonce: params.nonce,
    };

    state
        .services
        .auth_flow
        .authorize(command)
        .await
        .into_http()
        .map(Json)
}

pub async fn authenticate(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<AuthenticateRequest>,
) -> HttpResult<Json<Value>> {
    let command = ExchangeCodeCommand {
        code: payload.code,
        redirect_uri: payload.redirect_uri,
        state: payload.state,
        nonce: payload.nonce,
    };

    state
        .services
        .auth_flow
        .exchange_code(command)
        .await
        .into_http()
        .map(Json)
}

pub async fn userinfo(
    Extension(state): Extension<HttpState>,
    BearerToken(token): BearerToken,
) -> HttpResult<Json<Value>> {
    state
        .services
        .auth_flow
        .userinfo(&token)
        .await
        .into_http()
        .map(Json)
}
