use axum::extract::{Request, State};
use axum::Json;
use tracing::info;

use crate::app_state::AppState;
use crate::models::card::{LevelCardRequest, LevelCardResponse};
use crate::routes::error::ApiError;
use crate::routes::record_outcome;
use crate::services::endpoints::LEVEL_CARD;
use crate::services::validation::validate_request;

/// POST /api/v1/level-card — render a level card upstream and host the image.
pub async fn create_level_card(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<LevelCardResponse>, ApiError> {
    let result = create(&state, request).await;
    record_outcome(&LEVEL_CARD, &result);
    result
}

async fn create(state: &AppState, request: Request) -> Result<Json<LevelCardResponse>, ApiError> {
    let fields = validate_request(request, &LEVEL_CARD, state.body_limit)
        .await
        .map_err(|e| ApiError::validation(e, &LEVEL_CARD))?;
    let card =
        LevelCardRequest::from_fields(&fields).map_err(|e| ApiError::validation(e, &LEVEL_CARD))?;

    info!(user = %card.name, level = %card.level, "Creating level card");

    let image_url = state.pipeline.render_and_host(&card).await?;

    Ok(Json(LevelCardResponse {
        image_url,
        success: true,
    }))
}
