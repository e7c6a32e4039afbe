use axum::extract::{Request, State};
use axum::Json;

use crate::app_state::AppState;
use crate::models::chat::{ChatRequest, ChatResponse};
use crate::routes::error::ApiError;
use crate::routes::record_outcome;
use crate::services::chat;
use crate::services::endpoints::CHAT;
use crate::services::validation::validate_request;

/// POST /api/v1/chat — reply from the static knowledge and personality tables.
pub async fn chat_reply(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ChatResponse>, ApiError> {
    let result = reply(&state, request).await;
    record_outcome(&CHAT, &result);
    result
}

async fn reply(state: &AppState, request: Request) -> Result<Json<ChatResponse>, ApiError> {
    let fields = validate_request(request, &CHAT, state.body_limit)
        .await
        .map_err(|e| ApiError::validation(e, &CHAT))?;
    let message = ChatRequest::from_fields(&fields).map_err(|e| ApiError::validation(e, &CHAT))?;

    let response = chat::respond(&message, &mut rand::rng());
    Ok(Json(response))
}
