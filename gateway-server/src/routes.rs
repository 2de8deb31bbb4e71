//! Router setup and the serve loop.

use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use gateway_core::{Config, GatewayService, providers_from_config, upload::MAX_UPLOAD_BYTES};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{handlers, state::AppState};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::hello))
        .route("/user/repos", get(handlers::user_repos))
        .route("/summery", get(handlers::summary))
        .route("/weather/:city", get(handlers::weather))
        .route(
            "/upload",
            post(handlers::upload_file)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Build the upstream clients from `config` and serve until Ctrl-C.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let providers = providers_from_config(&config)?;
    let state = AppState::new(GatewayService::from(providers));
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        %addr,
        github = %config.github_api_url,
        openweather = %config.openweather_api_url,
        api_key_configured = config.has_api_key(),
        "Gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
