use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the active matching configuration.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "shortlist-api",
        "similarity_threshold": state.config.similarity_threshold,
        "document_ai_enabled": state.docai.is_some(),
    }))
}
