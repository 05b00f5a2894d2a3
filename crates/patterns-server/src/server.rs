//! HTTP server implementation using Axum.

use crate::handler::{handle_health, handle_patterns};
use axum::{
    routing::{any, get},
    Router,
};
use patterns_core::PatternDirectory;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Application state shared across handlers.
pub struct AppState {
    pub directory: PatternDirectory,
}

/// Build the router. `GET` routes answer `HEAD` as well; `/patterns` takes
/// every method and rejects the ones it does not serve.
pub fn router(directory: PatternDirectory) -> Router {
    let state = Arc::new(AppState { directory });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/patterns", any(handle_patterns))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_server(
    directory: PatternDirectory,
    host: &str,
    port: u16,
) -> anyhow::Result<SocketAddr> {
    let app = router(directory);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}
