//! API routes for the twin server

pub mod ask;
pub mod health;
pub mod ingest;
pub mod query;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Local pipeline
        .route("/twin/query", post(query::query_twin))
        .route("/twin/ingest_texts", post(ingest::ingest_texts))
        // Backend chain
        .route("/ask", post(ask::ask))
        .route("/health", get(health::health))
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "twin-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Green Hill Canarias digital twin: retrieval-augmented answers per audience",
        "endpoints": {
            "POST /api/twin/query": "Answer with vector retrieval + LLM",
            "POST /api/twin/ingest_texts": "Add raw texts to the vector store (token required)",
            "POST /api/ask": "Answer for an audience via the backend chain",
            "GET /api/health": "Component status",
            "GET /health": "Component status",
            "GET /ready": "Readiness probe"
        },
        "audiences": ["public", "investor", "boardroom"]
    }))
}
