//! Token-protected ingestion endpoint

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};

use crate::error::Result;
use crate::ingestion;
use crate::server::{auth::authorize, state::AppState};
use crate::types::{query::IngestRequest, response::IngestResponse};

/// POST /api/twin/ingest_texts - Add raw texts to the vector collection
pub async fn ingest_texts(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<IngestResponse>> {
    // Token first: a bad token is 401 whatever the body holds
    authorize(state.config().server.ingest_token.as_deref(), &headers)?;
    let request: IngestRequest = serde_json::from_slice(&body)?;

    tracing::info!("Ingest request with {} texts", request.texts.len());

    let response = ingestion::ingest_texts(state.store(), &request.texts).await?;
    Ok(Json(response))
}
