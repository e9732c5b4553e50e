//! Router assembly and server lifecycle.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::error::RelayError;
use crate::routes::{convert, health, summarize};
use crate::state::AppState;

/// Build the router with all routes and middleware.
///
/// Fails only when the configured CORS origins don't parse as header values.
pub fn build_router(state: AppState) -> Result<Router, RelayError> {
    let cors = cors_layer(&state.config)?;
    let max_body_bytes = state.config.max_body_bytes;

    Ok(Router::new()
        .route("/", get(health::usage))
        .route("/test", get(health::test))
        .route("/buffer-to-text", post(convert::buffer_to_text))
        .route("/blob-to-text", post(convert::blob_to_text))
        .route("/summarize", post(summarize::summarize))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// CORS restricted to the configured origin allow-list and the three methods
/// the API actually serves.
fn cors_layer(config: &AppConfig) -> Result<CorsLayer, RelayError> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| RelayError::InvalidConfig(format!("invalid CORS origin: {origin}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: AppConfig) -> Result<(), RelayError> {
    let addr = config.socket_addr();
    let state = AppState::new(config)?;
    let app = build_router(state)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| RelayError::Internal(format!("failed to bind {addr}: {e}")))?;

    info!("docrelay listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RelayError::Internal(format!("server error: {e}")))?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
