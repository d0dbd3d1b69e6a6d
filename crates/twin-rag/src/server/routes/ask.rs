//! Audience-routed ask endpoint backed by the fallback chain

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::{extract::ApiJson, state::AppState};
use crate::types::{
    query::{validate_question, AskRequest},
    response::AskResponse,
    Audience,
};

/// POST /api/ask - Try each answer backend in order
pub async fn ask(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AskRequest>,
) -> Result<Json<AskResponse>> {
    // Audience is checked before any backend is called
    let audience: Audience = request.audience.parse()?;
    let question = validate_question(&request.question)?;

    tracing::info!("Ask ({}): \"{}\"", audience, question);

    let result = state.chain().answer(question, audience).await?;

    Ok(Json(AskResponse {
        answer: result.answer,
        audience,
        backend: result.backend,
        fallbacks: result.failures,
    }))
}
