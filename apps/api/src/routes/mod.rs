pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::documents::handlers as documents;
use crate::matching::handlers as matching;
use crate::state::AppState;

/// Uploaded PDFs routinely exceed axum's 2 MB default body limit.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/filter_resumes",
            post(matching::handle_filter_resumes),
        )
        .route(
            "/api/v1/process_document",
            post(documents::handle_process_document),
        )
        .route("/api/v1/upload_jd", post(documents::handle_upload_jd))
        .route(
            "/api/v1/upload_resumes",
            post(documents::handle_upload_resumes),
        )
        .route(
            "/api/v1/upload_from_url",
            post(documents::handle_upload_from_url),
        )
        .route("/api/v1/match", post(documents::handle_match))
        .route("/api/v1/download", get(documents::handle_download))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
