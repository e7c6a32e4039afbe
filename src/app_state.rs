use std::sync::Arc;

use reqwest::Client;

use crate::config::AppConfig;
use crate::services::{
    image_host::ImageHostClient,
    pipeline::CardPipeline,
    render::CardRenderer,
    render_api::RenderServiceClient,
};

/// Shared application state passed to all route handlers.
///
/// Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<CardRenderer>,
    pub pipeline: Arc<CardPipeline>,
    pub body_limit: usize,
}

impl AppState {
    pub fn new(renderer: CardRenderer, pipeline: CardPipeline, body_limit: usize) -> Self {
        Self {
            renderer: Arc::new(renderer),
            pipeline: Arc::new(pipeline),
            body_limit,
        }
    }

    /// Wire up every service from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let http = Client::new();

        let renderer = CardRenderer::new(config.card_markup, config.card_escape_markup);
        let pipeline = CardPipeline::new(
            http.clone(),
            RenderServiceClient::new(http.clone(), config.render_service_url.clone()),
            ImageHostClient::new(
                http,
                config.image_host_url.clone(),
                config.image_host_token.clone(),
            ),
            config.rehost_max_bytes,
        );

        Self::new(renderer, pipeline, config.request_body_limit)
    }
}
