pub mod card;
pub mod chat;
pub mod error;
pub mod health;
pub mod level_card;
pub mod metrics;
pub mod rehost;

use std::any::Any;

use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::routes::error::ApiError;
use crate::services::validation::FieldSpec;

/// Build the API router.
///
/// Card endpoints are mounted with `any` so that wrong methods reach the
/// handler and get the same error envelope as every other failure. Body size
/// is enforced by the handlers after the method check, not by a layer.
/// CORS preflight (`OPTIONS`) is the one method answered before a handler.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/card", any(card::render_card))
        .route("/api/v1/level-card", any(level_card::create_level_card))
        .route("/api/v1/rehost", any(rehost::rehost_image))
        .route("/api/v1/chat", any(chat::chat_reply))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Count one request outcome for an endpoint.
pub(crate) fn record_outcome<T>(spec: &FieldSpec, result: &Result<T, ApiError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    ::metrics::counter!("card_requests_total", "endpoint" => spec.name, "outcome" => outcome)
        .increment(1);
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::Unhandled(message).into_response()
}
