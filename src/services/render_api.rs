use axum::body::Bytes;
use image::ImageFormat;
use reqwest::{Client, StatusCode};

use crate::models::card::ExternalCardPayload;

/// Image bytes produced by an upstream, with their sniffed format.
#[derive(Debug, Clone)]
pub struct UpstreamImage {
    pub bytes: Bytes,
    pub format: ImageFormat,
}

impl UpstreamImage {
    /// Accept `bytes` only if they start with a recognizable image signature.
    pub fn sniff(bytes: Bytes) -> Option<Self> {
        let format = image::guess_format(&bytes).ok()?;
        Some(Self { bytes, format })
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("bin")
    }
}

/// Client for the external card rendering service.
pub struct RenderServiceClient {
    http: Client,
    url: String,
}

impl RenderServiceClient {
    pub fn new(http: Client, url: String) -> Self {
        Self { http, url }
    }

    /// POST the card payload and return the rendered image.
    pub async fn render(
        &self,
        payload: &ExternalCardPayload,
    ) -> Result<UpstreamImage, RenderServiceError> {
        let response = self.http.post(&self.url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderServiceError::Status(status));
        }

        let bytes = response.bytes().await?;
        UpstreamImage::sniff(bytes).ok_or(RenderServiceError::NotAnImage)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderServiceError {
    #[error("HTTP request to rendering service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rendering service responded with {0}")]
    Status(StatusCode),

    #[error("Rendering service did not return an image")]
    NotAnImage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_png() {
        let png = Bytes::from_static(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR");
        let image = UpstreamImage::sniff(png).unwrap();
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.extension(), "png");
    }

    #[test]
    fn test_sniff_rejects_text() {
        assert!(UpstreamImage::sniff(Bytes::from_static(b"{\"error\":\"boom\"}")).is_none());
    }
}
