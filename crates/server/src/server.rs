//! Server initialization and routing
//!
//! This module handles the axum server setup including:
//! - Router configuration for both surfaces (dashboard and prediction API)
//! - Middleware stack (timeout, compression, CORS, tracing)
//! - Eager model loading before the listener binds
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::routes::{api_info, dashboard, health, not_found, predict};
use crate::state::AppState;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the axum router with all routes and middleware.
///
/// Both surfaces share one `AppState` (and therefore one model registry and
/// one predict routine); they differ only in transport and rendering:
/// - Dashboard: `GET /` (page), `GET /about` (model explainer),
///   `POST /analyze` (binary policy)
/// - API: `POST /predict` (tri-state policy)
/// - Probes: `GET /health`, `GET /ready`
pub fn build_router(state: AppState) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let timeout = Duration::from_secs(state.config.timeout_secs);

    Router::new()
        .route("/", get(dashboard::page))
        .route("/about", get(dashboard::about))
        .route("/analyze", post(dashboard::analyze))
        .route("/predict", post(predict::predict))
        .route("/api", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Senti Hotel HTTP server.
///
/// Models are loaded eagerly before the TCP listener binds: a load failure
/// means the process exits without ever accepting traffic, rather than
/// failing every request afterwards. This function blocks until shutdown via
/// SIGTERM or Ctrl+C.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .json()
        .init();

    health::mark_started();

    let state = AppState::new(config.clone());

    tracing::info!(
        encoder = %config.models.encoder_name,
        classifier = %config.models.classifier_path.display(),
        mode = %config.models.mode,
        "loading models"
    );
    state.registry.get_or_load().await?;
    tracing::info!("models ready");

    let app = build_router(state);

    let addr: SocketAddr = config.socket_addr()?;
    tracing::info!("starting senti-server on {addr}");
    tracing::info!(
        "timeout: {}s, cors: {}",
        config.timeout_secs,
        config.enable_cors
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
