use serde::Serialize;

use crate::services::validation::{ValidatedFields, ValidationError};

/// Inbound chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub content: String,
    pub bio: String,
    pub personality: Option<String>,
    pub prompt: Option<String>,
    pub memories: Option<String>,
}

impl ChatRequest {
    pub fn from_fields(fields: &ValidatedFields) -> Result<Self, ValidationError> {
        Ok(Self {
            content: fields.require_text("content")?.to_string(),
            bio: fields.require_text("bio")?.to_string(),
            personality: fields.text("personality").map(str::to_string),
            prompt: fields.text("prompt").map(str::to_string),
            memories: fields.text("memories").map(str::to_string),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub details: ChatDetails,
}

#[derive(Debug, Serialize)]
pub struct ChatDetails {
    /// Personality as requested, or "default" when none was given.
    pub personality: String,
    pub bio: String,
    pub prompt_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memories: Option<String>,
}
