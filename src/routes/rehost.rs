use axum::extract::{Request, State};
use axum::Json;

use crate::app_state::AppState;
use crate::models::card::RehostResponse;
use crate::routes::error::ApiError;
use crate::routes::record_outcome;
use crate::services::endpoints::REHOST;
use crate::services::validation::validate_request;

/// POST /api/v1/rehost — copy an image from its URL to the image host.
pub async fn rehost_image(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<RehostResponse>, ApiError> {
    let result = rehost(&state, request).await;
    record_outcome(&REHOST, &result);
    result
}

async fn rehost(state: &AppState, request: Request) -> Result<Json<RehostResponse>, ApiError> {
    let fields = validate_request(request, &REHOST, state.body_limit)
        .await
        .map_err(|e| ApiError::validation(e, &REHOST))?;
    let original_url = fields
        .require_text("url")
        .map_err(|e| ApiError::validation(e, &REHOST))?
        .to_string();

    let hosted_url = state.pipeline.rehost(&original_url).await?;

    Ok(Json(RehostResponse {
        hosted_url,
        original_url,
    }))
}
