//! Health and readiness endpoints

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::server::state::AppState;
use crate::types::response::HealthResponse;

/// GET /health, GET /api/health - Component status
///
/// Always 200: a degraded twin still answers questions.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let vector_store = state.store().health().await;

    let (status, message) = if vector_store.available {
        ("healthy", "Digital twin is running")
    } else {
        ("degraded", "Digital twin is running without a vector store")
    };

    Json(HealthResponse {
        status: status.to_string(),
        message: message.to_string(),
        vector_store,
        backends: state.chain().names(),
        timestamp: Utc::now(),
    })
}

/// GET /ready - 200 once the vector store is open
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
