//! Render-then-host and rehost flows.
//!
//! Each flow makes its upstream calls strictly in sequence, since every call
//! consumes the previous one's output. There is no retry and no compensation:
//! a failed upload after a successful render simply reports the failure.

use std::time::Instant;

use axum::body::Bytes;
use reqwest::Client;
use tracing::info;

use crate::models::card::{ExternalCardPayload, LevelCardRequest};
use crate::services::image_host::{ImageHostClient, ImageHostError};
use crate::services::render_api::{RenderServiceClient, RenderServiceError, UpstreamImage};

pub struct CardPipeline {
    http: Client,
    renderer: RenderServiceClient,
    host: ImageHostClient,
    /// Largest source image `rehost` will download.
    max_source_bytes: usize,
}

impl CardPipeline {
    pub fn new(
        http: Client,
        renderer: RenderServiceClient,
        host: ImageHostClient,
        max_source_bytes: usize,
    ) -> Self {
        Self {
            http,
            renderer,
            host,
            max_source_bytes,
        }
    }

    /// Render a level card upstream and host the result.
    pub async fn render_and_host(&self, card: &LevelCardRequest) -> Result<String, PipelineError> {
        let payload = ExternalCardPayload::from(card);

        let started = Instant::now();
        let image = self.renderer.render(&payload).await;
        observe_upstream("render", started);
        let image = image?;

        info!(
            user = %card.name,
            bytes = image.bytes.len(),
            format = image.mime_type(),
            "Rendering service returned card image"
        );

        self.host(&image).await
    }

    /// Download an existing image and host a copy of it.
    pub async fn rehost(&self, source_url: &str) -> Result<String, PipelineError> {
        let started = Instant::now();
        let image = self.fetch_source(source_url).await;
        observe_upstream("source", started);
        let image = image?;

        info!(source = %source_url, bytes = image.bytes.len(), "Fetched source image");

        self.host(&image).await
    }

    async fn host(&self, image: &UpstreamImage) -> Result<String, PipelineError> {
        let started = Instant::now();
        let hosted = self.host.upload(image).await;
        observe_upstream("host", started);
        let hosted = hosted?;

        info!(url = %hosted, "Image hosted");
        Ok(hosted)
    }

    async fn fetch_source(&self, url: &str) -> Result<UpstreamImage, PipelineError> {
        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Source(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Source(format!("source responded with {status}")));
        }

        if response
            .content_length()
            .is_some_and(|length| length > self.max_source_bytes as u64)
        {
            return Err(self.source_too_large());
        }

        // Content-Length may be absent or wrong, so the cap is enforced while reading too.
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| PipelineError::Source(e.to_string()))?
        {
            if bytes.len() + chunk.len() > self.max_source_bytes {
                return Err(self.source_too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        UpstreamImage::sniff(Bytes::from(bytes))
            .ok_or_else(|| PipelineError::Source("source is not an image".to_string()))
    }

    fn source_too_large(&self) -> PipelineError {
        PipelineError::Source(format!(
            "source is larger than {} bytes",
            self.max_source_bytes
        ))
    }
}

fn observe_upstream(upstream: &'static str, started: Instant) {
    metrics::histogram!("upstream_request_seconds", "upstream" => upstream)
        .record(started.elapsed().as_secs_f64());
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Upstream render failure: {0}")]
    Render(#[from] RenderServiceError),

    #[error("Upstream source failure: {0}")]
    Source(String),

    #[error("Upstream hosting failure: {0}")]
    Hosting(#[from] ImageHostError),
}
