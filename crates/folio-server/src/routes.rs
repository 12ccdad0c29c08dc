//! Route definitions.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{self, AppState};

/// Create the API router.
///
/// # Arguments
/// * `state` - Parser, pipeline and upload limit shared by all handlers
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        // Health
        .route("/health", get(handlers::health))
        // Extraction
        .route(
            "/api/parse-portfolio",
            post(handlers::parse_portfolio).fallback(handlers::method_not_allowed),
        )
        // Analysis
        .route(
            "/api/ask-question",
            post(handlers::ask_question).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/what-if",
            post(handlers::what_if_analysis).fallback(handlers::method_not_allowed),
        )
        .layer(body_limit)
        .with_state(state)
}
