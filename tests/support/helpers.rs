// tests/support/helpers.rs
use axum::{Router, body, http::StatusCode, response::Response};
use sekisho::application::services::{
    ApplicationServices,
    auth_flow::AuthFlowService,
    gateway::{GatewayService, GatewaySettings},
};
use sekisho::infrastructure::oidc::{DiscoveryCache, OidcClientFactory, OidcSettings};
use sekisho::presentation::http::{
    routes::{build_auth_router, build_gateway_router},
    state::HttpState,
};
use serde_json::{Value, json};
use std::{net::TcpListener as StdTcpListener, sync::Arc, time::Duration};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const CLIENT_ID: &str = "sekisho-test";
pub const CLIENT_SECRET: &str = "sekisho-secret";
pub const TEST_CALLBACK_URL: &str = "http://localhost:8084/auth/callback";
pub const TEST_WEB_UI_URL: &str = "http://web.example/app";
pub const TEST_MOBILE_UI_URL: &str = "http://mobile.example/app";

/// Base URL for upstreams a given test never expects to reach.
pub const DEAD_UPSTREAM: &str = "http://127.0.0.1:9";

/// Discovery document the mock IdP serves, pointing every endpoint back at
/// the mock itself.
pub fn discovery_document(idp_uri: &str, with_userinfo: bool) -> Value {
    let mut doc = json!({
        "issuer": idp_uri,
        "authorization_endpoint": format!("{idp_uri}/authorize"),
        "token_endpoint": format!("{idp_uri}/token"),
        "jwks_uri": format!("{idp_uri}/jwks"),
        "response_types_supported": ["code"],
    });
    if with_userinfo {
        doc["userinfo_endpoint"] = json!(format!("{idp_uri}/userinfo"));
    }
    doc
}

pub async fn mount_discovery(server: &MockServer, with_userinfo: bool) {
    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(discovery_document(&server.uri(), with_userinfo)),
        )
        .mount(server)
        .await;
}

/// Mock IdP that already answers discovery requests.
pub async fn start_idp(with_userinfo: bool) -> MockServer {
    let server = MockServer::start().await;
    mount_discovery(&server, with_userinfo).await;
    server
}

pub fn build_services(
    issuer: &str,
    auth_base: &str,
    backend_base: &str,
) -> Arc<ApplicationServices> {
    let http = reqwest::Client::new();
    let timeout = Duration::from_secs(5);

    let discovery = Arc::new(DiscoveryCache::new(http.clone(), issuer, timeout));
    let clients = Arc::new(OidcClientFactory::new(
        http.clone(),
        OidcSettings {
            issuer: issuer.to_string(),
            client_id: CLIENT_ID.to_string(),
            client_secret: CLIENT_SECRET.to_string(),
            redirect_uri_base: "http://localhost:8083".to_string(),
        },
        discovery,
        timeout,
    ));

    let auth_flow = Arc::new(AuthFlowService::new(clients));
    let gateway = Arc::new(GatewayService::new(
        http,
        GatewaySettings {
            auth_base_url: auth_base.to_string(),
            backend_base_url: backend_base.to_string(),
            callback_url: TEST_CALLBACK_URL.to_string(),
            web_ui_url: TEST_WEB_UI_URL.to_string(),
            mobile_ui_url: TEST_MOBILE_UI_URL.to_string(),
            auth_timeout: timeout,
            proxy_timeout: timeout,
        },
    ));

    Arc::new(ApplicationServices::new(auth_flow, gateway))
}

pub fn make_auth_router(issuer: &str) -> Router {
    let services = build_services(issuer, DEAD_UPSTREAM, DEAD_UPSTREAM);
    build_auth_router(HttpState { services })
}

pub fn make_gateway_router(auth_base: &str, backend_base: &str) -> Router {
    let services = build_services(DEAD_UPSTREAM, auth_base, backend_base);
    build_gateway_router(HttpState { services })
}

/// Serve the auth router on an OS-assigned port, for tests where the gateway
/// has to reach a real auth service over HTTP.
pub async fn spawn_auth_service(issuer: &str) -> String {
    let app = make_auth_router(issuer);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A URL nothing listens on: bind an ephemeral port, then release it.
pub fn unreachable_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or_else(|err| {
        panic!(
            "invalid JSON body ({status}): {err}: {}",
            String::from_utf8_lossy(&bytes)
        )
    });
    (status, json)
}

pub async fn read_text(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// Assert a service-coined error reply: expected status, JSON content type
/// and the given `error` code. Returns the body for further checks.
pub async fn assert_error_response(response: Response, status: StatusCode, error: &str) -> Value {
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let (got, json) = read_json(response).await;
    assert_eq!(got, status, "unexpected status, body: {json}");
    assert!(
        content_type.starts_with("application/json"),
        "unexpected content-type: {content_type}"
    );
    assert_eq!(
        json.get("error").and_then(Value::as_str),
        Some(error),
        "unexpected error body: {json}"
    );
    json
}
