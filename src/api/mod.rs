//! REST API for on-demand trend analysis.
//!
//! Provides three endpoints:
//! - `POST /analyze`: one series, labels, and alarm threshold
//! - `POST /charts`: a chart payload keyed by item id
//! - `GET /params`: the active analyzer parameters

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::trend::TrendAnalyzer;

pub use types::{AnalyzeRequest, ErrorResponse};

/// Immutable application state shared across all request handlers.
pub struct AppState {
    /// Analyzer configured from the loaded parameters.
    pub analyzer: TrendAnalyzer,
    /// Decimals kept when flooring litre figures in chart reports.
    pub decimals: u32,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/charts", post(handlers::analyze_charts))
        .route("/params", get(handlers::get_params))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
