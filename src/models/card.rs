use std::fmt;

use serde::{Serialize, Serializer};

use crate::services::validation::{ValidatedFields, ValidationError};

/// A validated numeric field.
///
/// Whole numbers display and serialize without a fractional part, so a rank of
/// `3` renders as `#3` rather than `#3.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Numeric(pub f64);

impl Numeric {
    fn as_whole(self) -> Option<i64> {
        let whole = self.0.fract() == 0.0 && self.0.abs() < 1e15;
        whole.then_some(self.0 as i64)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_whole() {
            Some(whole) => write!(f, "{whole}"),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_whole() {
            Some(whole) => serializer.serialize_i64(whole),
            None => serializer.serialize_f64(self.0),
        }
    }
}

/// Inbound payload for the locally rendered rank card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRequest {
    pub user_name: String,
    pub rank: Numeric,
    pub rank_text: String,
    pub avatar: String,
    pub xp: Numeric,
    pub max_xp: Numeric,
    pub avatar_border: Option<String>,
    pub bar: Option<String>,
    pub bar_placeholder: Option<String>,
}

impl CardRequest {
    pub fn from_fields(fields: &ValidatedFields) -> Result<Self, ValidationError> {
        Ok(Self {
            user_name: fields.require_text("user_name")?.to_string(),
            rank: Numeric(fields.require_number("rank")?),
            rank_text: fields.require_text("rank_text")?.to_string(),
            avatar: fields.require_text("avatar")?.to_string(),
            xp: Numeric(fields.require_number("xp")?),
            max_xp: Numeric(fields.require_number("max_xp")?),
            avatar_border: fields.text("avatar_border").map(str::to_string),
            bar: fields.text("bar").map(str::to_string),
            bar_placeholder: fields.text("bar_placeholder").map(str::to_string),
        })
    }
}

/// Inbound payload for the upstream-rendered level card.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCardRequest {
    pub name: String,
    pub level: Numeric,
    pub xp: Numeric,
    pub xp_required: Numeric,
    pub rank: Numeric,
    pub icon: String,
}

impl LevelCardRequest {
    pub fn from_fields(fields: &ValidatedFields) -> Result<Self, ValidationError> {
        Ok(Self {
            name: fields.require_text("name")?.to_string(),
            level: Numeric(fields.require_number("level")?),
            xp: Numeric(fields.require_number("xp")?),
            xp_required: Numeric(fields.require_number("xp_required")?),
            rank: Numeric(fields.require_number("rank")?),
            icon: fields.require_text("icon")?.to_string(),
        })
    }
}

/// Colors the rendering service is always given for level cards.
pub const LEVEL_CARD_BACKGROUND: &str = "#23272A";
pub const LEVEL_CARD_PROGRESS: &str = "#5865F2";
pub const LEVEL_CARD_TRACK: &str = "#484B4E";
pub const LEVEL_CARD_TEXT: &str = "#FFFFFF";

/// Payload sent to the external rendering service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalCardPayload {
    pub username: String,
    pub avatar_url: String,
    pub level: Numeric,
    pub rank: Numeric,
    pub current_xp: Numeric,
    pub required_xp: Numeric,
    pub background_color: &'static str,
    pub progress_color: &'static str,
    pub track_color: &'static str,
    pub text_color: &'static str,
}

impl From<&LevelCardRequest> for ExternalCardPayload {
    fn from(card: &LevelCardRequest) -> Self {
        Self {
            username: card.name.clone(),
            avatar_url: card.icon.clone(),
            level: card.level,
            rank: card.rank,
            current_xp: card.xp,
            required_xp: card.xp_required,
            background_color: LEVEL_CARD_BACKGROUND,
            progress_color: LEVEL_CARD_PROGRESS,
            track_color: LEVEL_CARD_TRACK,
            text_color: LEVEL_CARD_TEXT,
        }
    }
}

/// Response for a successfully hosted level card.
#[derive(Debug, Serialize)]
pub struct LevelCardResponse {
    pub image_url: String,
    pub success: bool,
}

/// Response for a successfully rehosted image.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RehostResponse {
    pub hosted_url: String,
    pub original_url: String,
}
