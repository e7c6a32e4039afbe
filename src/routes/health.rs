use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub markup: String,
    pub timestamp: DateTime<Utc>,
}

/// GET /health — liveness plus the rendering mode selected at startup.
///
/// Upstreams are not checked: any request to the image host would be a real
/// upload.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        markup: state.renderer.markup().to_string(),
        timestamp: Utc::now(),
    })
}
