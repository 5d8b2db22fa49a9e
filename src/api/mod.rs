//! Read-only HTTP view over stored readings.
//!
//! Two GET endpoints:
//! - `/health` liveness probe
//! - `/readings` most recent readings, optionally filtered by category

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

pub use types::{ErrorResponse, HealthResponse, ReadingsQuery};

use crate::sink::ReadingLog;

/// Readings returned when `limit` is not given.
pub const DEFAULT_LIMIT: usize = 24;
/// Largest accepted `limit`.
pub const MAX_LIMIT: usize = 1000;

/// Application state shared across request handlers.
pub struct AppState {
    /// Store the readings are listed from.
    pub log: Arc<dyn ReadingLog>,
    /// Collection served by `/readings`.
    pub collection: String,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/readings", get(handlers::get_readings))
        .with_state(state)
}

/// Binds to `addr` and serves the API until the server fails.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server stops
/// with an error.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
