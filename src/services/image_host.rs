use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use crate::services::render_api::UpstreamImage;

/// Suffix the host appends to the page URL it hands back.
const HOSTED_URL_SUFFIX: &str = "/json";

/// Client for the public image host.
///
/// Uploads are anonymous apart from the fixed access token, and are not
/// idempotent: uploading the same bytes twice yields two hosted images.
pub struct ImageHostClient {
    http: Client,
    url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct HostResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl HostResponse {
    fn reports_success(&self) -> bool {
        self.success == Some(true)
            || self
                .status
                .as_deref()
                .is_some_and(|status| status.eq_ignore_ascii_case("ok"))
    }
}

impl ImageHostClient {
    pub fn new(http: Client, url: String, token: String) -> Self {
        Self { http, url, token }
    }

    /// Upload image bytes and return the normalized hosted URL.
    pub async fn upload(&self, image: &UpstreamImage) -> Result<String, ImageHostError> {
        let file_name = format!("card-{}.{}", Uuid::new_v4(), image.extension());
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(file_name)
            .mime_str(image.mime_type())?;

        let form = Form::new()
            .part("file", part)
            .text("token", self.token.clone());

        let response = self.http.post(&self.url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageHostError::Status(status));
        }

        let body: HostResponse = response
            .json()
            .await
            .map_err(|e| ImageHostError::Decode(e.to_string()))?;

        if !body.reports_success() {
            return Err(ImageHostError::Rejected(
                body.error
                    .or(body.status)
                    .unwrap_or_else(|| "no status reported".to_string()),
            ));
        }

        body.url
            .filter(|url| !url.is_empty())
            .map(|url| normalize_hosted_url(&url))
            .ok_or(ImageHostError::MissingUrl)
    }
}

/// Strip the API suffix from a hosted URL.
pub fn normalize_hosted_url(url: &str) -> String {
    url.strip_suffix(HOSTED_URL_SUFFIX).unwrap_or(url).to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ImageHostError {
    #[error("HTTP request to image host failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image host responded with {0}")]
    Status(StatusCode),

    #[error("Image host returned an unreadable response: {0}")]
    Decode(String),

    #[error("Image host rejected the upload: {0}")]
    Rejected(String),

    #[error("Image host response did not include a URL")]
    MissingUrl,
}
