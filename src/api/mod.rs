//! REST API over the diversity engine.
//!
//! Routes:
//! - `POST /calculate` runs the engine on a JSON circuit list
//! - `GET /rules` lists the diversity table for a location
//! - `GET /result` returns the result computed at startup, if any

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

pub use types::{CalculateRequest, ErrorResponse, RulesQuery};

use crate::diversity::DiversityResult;
use crate::loads::Supply;

/// Immutable application state shared across all request handlers.
///
/// Each `/calculate` request is evaluated independently; nothing is written
/// back, so no locks are needed.
pub struct AppState {
    /// Supply used when a request does not carry its own.
    pub supply: Supply,
    /// Result for the installation the server was started with.
    pub result: Option<DiversityResult>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/calculate", post(handlers::calculate))
        .route("/rules", get(handlers::get_rules))
        .route("/result", get(handlers::get_result))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
