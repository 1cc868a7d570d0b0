// src/presentation/http/routes.rs
use crate::presentation::http::controllers::{auth, gateway, proxy};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json, Router,
    http::Method,
    routing::{get, post},
};
use serde::Serialize;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Routes served by the authentication service.
pub fn build_auth_router(state: HttpState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/authorize", get(auth::authorize))
        .route("/authenticate", post(auth::authenticate))
        .route("/userinfo", get(auth::userinfo))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

/// Routes served by the gateway: the UI landing redirect, login delegation,
/// the userinfo relay and the authenticated `/api` proxy.
pub fn build_gateway_router(state: HttpState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(tower_http::cors::Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/", get(gateway::root))
        .route("/health", get(health))
        .route("/auth/login", get(gateway::login))
        .route("/auth/callback", get(gateway::callback))
        .route("/me", get(gateway::me))
        .route(
            "/api/{*path}",
            get(proxy::forward)
                .post(proxy::forward)
                .put(proxy::forward)
                .patch(proxy::forward)
                .delete(proxy::forward),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
}

pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".into(),
    })
}
