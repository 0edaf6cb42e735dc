//! Question answering endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

/// POST /ask - Answer a question from the ingested documents
///
/// Backend failures still produce 200 with an empty answer; the service logs the cause.
pub async fn ask(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!("Rejected question payload: {}", e);
        Error::bad_request(e.body_text())
    })?;

    let question = request
        .non_blank_question()
        .ok_or_else(|| Error::bad_request("Question is required."))?;

    let response = state.chat_service().ask_question(question).await;
    Ok(Json(response))
}
