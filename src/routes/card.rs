use axum::extract::{Request, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::app_state::AppState;
use crate::models::card::CardRequest;
use crate::routes::error::ApiError;
use crate::routes::record_outcome;
use crate::services::endpoints::RANK_CARD;
use crate::services::render::RenderedArtifact;
use crate::services::validation::validate_request;

/// Rendered cards only depend on their inputs, so clients may cache them.
const CARD_CACHE_CONTROL: &str = "public, max-age=86400";

impl IntoResponse for RenderedArtifact {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, self.kind.content_type()),
                (header::CACHE_CONTROL, CARD_CACHE_CONTROL),
            ],
            self.body,
        )
            .into_response()
    }
}

/// POST /api/v1/card — render a rank card as SVG or HTML markup.
pub async fn render_card(
    State(state): State<AppState>,
    request: Request,
) -> Result<RenderedArtifact, ApiError> {
    let result = render(&state, request).await;
    record_outcome(&RANK_CARD, &result);
    result
}

async fn render(state: &AppState, request: Request) -> Result<RenderedArtifact, ApiError> {
    let fields = validate_request(request, &RANK_CARD, state.body_limit)
        .await
        .map_err(|e| ApiError::validation(e, &RANK_CARD))?;
    let card = CardRequest::from_fields(&fields).map_err(|e| ApiError::validation(e, &RANK_CARD))?;

    tracing::debug!(user = %card.user_name, markup = %state.renderer.markup(), "Rendering card");

    Ok(state.renderer.render(&card)?)
}
