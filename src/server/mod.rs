//! HTTP server setup
//!
//! Wires the transform endpoint, health check, and metrics exposition
//! into an axum router and runs it with graceful shutdown. One request
//! maps to one sequential pipeline invocation; requests share nothing
//! but the metrics registry.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::config::Config;
use crate::metrics::Metrics;

mod handler;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            metrics: Arc::new(Metrics::new()),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_body_size;

    Router::new()
        .route("/transform", post(handler::transform_image))
        .route("/health", get(handler::health_check))
        .route("/metrics", get(handler::metrics_export))
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(state)
}

/// Bind the configured address and serve until shutdown
pub async fn run(config: Config) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", config.server.address, config.server.port);
    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context(format!("Failed to bind to address {}", bind_addr))?;
    info!(
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        address = %listener.local_addr()?,
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
