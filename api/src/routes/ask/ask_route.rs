//! POST /{persona} — answers a signed question with the persona's knowledge base.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::ask::ask_request::{AskRequest, AskResponse},
};

/// Handler: POST /{persona}
///
/// Checks run in order: body shape, non-empty query, signature, persona.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/openai \
///   -H 'content-type: application/json' \
///   -d '{"client_id":"client_1","query":"Какая зарплата?","signature":"<hex>"}'
/// ```
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Path(persona): Path<String>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<Json<AskResponse>> {
    let Json(body) = payload?;
    if body.query.trim().is_empty() {
        return Err(AppError::Validation("query must not be empty".into()));
    }

    state
        .authenticator
        .authenticate(&body.client_id, &body.signature, &body.signed_params())
        .inspect_err(|e| warn!(%persona, client_id = %body.client_id, reason = %e, "rejected"))?;

    // Only authenticated callers learn which personas exist.
    let pipeline = state.pipeline(&persona).ok_or(AppError::NotFound)?;

    let result = pipeline.answer(&body.query).await;
    info!(%persona, client_id = %body.client_id, answered = result.is_answered(), "ask");

    Ok(Json(AskResponse {
        answer: result.into_text(),
    }))
}
