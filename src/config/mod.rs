use garde::Validate;
use serde::Deserialize;

use crate::services::render::MarkupKind;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    #[garde(length(min = 1))]
    pub bind_addr: String,

    /// Rendering service that turns a level card payload into an image.
    #[serde(default = "default_render_service_url")]
    #[garde(url)]
    pub render_service_url: String,

    /// Image host that receives the rendered bytes as a multipart upload.
    #[serde(default = "default_image_host_url")]
    #[garde(url)]
    pub image_host_url: String,

    /// Access token sent with every upload. The public host accepts "free".
    #[serde(default = "default_image_host_token")]
    #[garde(length(min = 1))]
    pub image_host_token: String,

    /// Markup family produced by the local card endpoint.
    #[serde(default)]
    #[garde(skip)]
    pub card_markup: MarkupKind,

    /// Escape user-supplied text before it is interpolated into markup.
    #[serde(default)]
    #[garde(skip)]
    pub card_escape_markup: bool,

    /// Maximum accepted request body in bytes.
    #[serde(default = "default_request_body_limit")]
    #[garde(range(min = 1024))]
    pub request_body_limit: usize,

    /// Maximum size of a source image downloaded by the rehost endpoint.
    #[serde(default = "default_rehost_max_bytes")]
    #[garde(range(min = 1024))]
    pub rehost_max_bytes: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_render_service_url() -> String {
    "http://127.0.0.1:8081/render".to_string()
}

fn default_image_host_url() -> String {
    "https://postimages.org/json/rr".to_string()
}

fn default_image_host_token() -> String {
    "free".to_string()
}

fn default_request_body_limit() -> usize {
    1024 * 1024
}

fn default_rehost_max_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            render_service_url: default_render_service_url(),
            image_host_url: default_image_host_url(),
            image_host_token: default_image_host_token(),
            card_markup: MarkupKind::default(),
            card_escape_markup: false,
            request_body_limit: default_request_body_limit(),
            rehost_max_bytes: default_rehost_max_bytes(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config: Self = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] garde::Report),
}
