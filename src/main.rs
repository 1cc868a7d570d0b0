use anyhow::Result;
use axum::{Router, ServiceExt, body::Body};
use sekisho::application::services::{
    ApplicationServices,
    auth_flow::AuthFlowService,
    gateway::{GatewayService, GatewaySettings},
};
use sekisho::config::AppConfig;
use sekisho::infrastructure::oidc::{DiscoveryCache, OidcClientFactory, OidcSettings};
use sekisho::presentation::http::{
    routes::{build_auth_router, build_gateway_router},
    state::HttpState,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let http = reqwest::Client::builder().build()?;

    let discovery = Arc::new(DiscoveryCache::new(
        http.clone(),
        config.oidc_issuer(),
        config.upstream_timeout(),
    ));
    let clients = Arc::new(OidcClientFactory::new(
        http.clone(),
        OidcSettings {
            issuer: config.oidc_issuer().to_string(),
            client_id: config.oidc_client_id().to_string(),
            client_secret: config.oidc_client_secret().to_string(),
            redirect_uri_base: config.oidc_redirect_uri_base().to_string(),
        },
        Arc::clone(&discovery),
        config.upstream_timeout(),
    ));

    let auth_flow = Arc::new(AuthFlowService::new(Arc::clone(&clients)));
    let gateway = Arc::new(GatewayService::new(
        http,
        GatewaySettings {
            auth_base_url: config.auth_base_url().to_string(),
            backend_base_url: config.backend_base_url().to_string(),
            callback_url: config.auth_callback_url().to_string(),
            web_ui_url: config.web_ui_url().to_string(),
            mobile_ui_url: config.mobile_ui_url().to_string(),
            auth_timeout: config.upstream_timeout(),
            proxy_timeout: config.proxy_timeout(),
        },
    ));

    let services = Arc::new(ApplicationServices::new(auth_flow, gateway));
    let state = HttpState {
        services: Arc::clone(&services),
    };

    let auth_app = build_auth_router(state.clone());
    let gateway_app = build_gateway_router(state);

    tokio::try_join!(
        serve(auth_app, config.auth_listen_addr(), "auth service"),
        serve(gateway_app, config.gateway_listen_addr(), "gateway"),
    )?;

    Ok(())
}

async fn serve(app: Router, addr: &str, name: &str) -> Result<()> {
    let service = app.into_service::<Body>().into_make_service();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("{name} listening on {address}");

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
