pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::documents::handlers as documents;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/match/score", post(matching::handle_score))
        .route("/api/v1/match", post(matching::handle_match))
        .route("/api/v1/jobs/analyze", post(matching::handle_analyze_jd))
        // Documents API
        .route("/api/v1/documents/convert", post(documents::handle_convert))
        // Resumes API
        .route("/api/v1/resumes/summarize", post(documents::handle_summarize))
        .route("/api/v1/resumes/parse", post(documents::handle_upstream_parse))
        .route(
            "/api/v1/resumes/markdown",
            post(documents::handle_upstream_markdown),
        )
        .route("/api/v1/resumes/score", post(documents::handle_upstream_score))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
