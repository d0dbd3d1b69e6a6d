//! Local pipeline query endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::server::{extract::ApiJson, state::AppState};
use crate::types::{
    query::{validate_question, QueryRequest},
    response::QueryResponse,
    Audience,
};

/// POST /api/twin/query - Answer with retrieval + generation
pub async fn query_twin(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let start = Instant::now();
    let question = validate_question(&request.question)?;
    let audience = Audience::parse_optional(request.audience.as_deref())?;

    tracing::info!("Query ({}): \"{}\"", audience, question);

    let result = state.pipeline().run(question, audience).await;

    tracing::info!(
        "Query answered in {}ms{}",
        start.elapsed().as_millis(),
        result.error().map(|e| format!(" (degraded: {})", e)).unwrap_or_default()
    );

    Ok(Json(result.into_response()))
}
