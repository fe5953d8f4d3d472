//! Route definitions.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use volscope_analytics::AnalysisConfig;

use crate::handlers::{self, AppState};

/// Create the API router.
///
/// # Arguments
/// * `config` - Analysis parameters shared by every handler
pub fn create_router(config: AnalysisConfig) -> Router {
    let state = Arc::new(AppState::new(config));

    Router::new()
        // Health
        .route("/health", get(handlers::health))
        // Volatility
        .route("/analyze-volatility", post(handlers::analyze_volatility))
        .route("/analyze-volatility/batch", post(handlers::analyze_volatility_batch))
        // Price history
        .route("/historical-volatility", post(handlers::compute_historical_volatility))
        .route("/analyze-index", post(handlers::analyze_index))
        // State
        .with_state(state)
}
