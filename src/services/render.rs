//! Local rank card rendering.
//!
//! Produces either a self-contained SVG image or an HTML document intended for
//! a downstream rasterizer. Output is a pure function of the request and the
//! renderer settings.

use askama::Template;
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::models::card::CardRequest;

/// Track length of the SVG progress bar, in user units.
pub const BAR_TRACK_LENGTH: f64 = 400.0;

pub const DEFAULT_AVATAR_BORDER: &str = "#FFFFFF";
pub const DEFAULT_BAR: &str = "#FFFFFF";
pub const DEFAULT_SVG_BAR_PLACEHOLDER: &str = "#80808080";
pub const DEFAULT_HTML_BAR_PLACEHOLDER: &str = "#808080";

/// Markup family produced for a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkupKind {
    #[default]
    Svg,
    Html,
}

impl MarkupKind {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Html => "text/html; charset=utf-8",
        }
    }

    fn default_bar_placeholder(self) -> &'static str {
        match self {
            Self::Svg => DEFAULT_SVG_BAR_PLACEHOLDER,
            Self::Html => DEFAULT_HTML_BAR_PLACEHOLDER,
        }
    }
}

/// Markup produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact {
    pub kind: MarkupKind,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

/// Values interpolated into either template.
struct CardView {
    user_name: String,
    rank_label: String,
    avatar: String,
    avatar_border: String,
    bar: String,
    bar_placeholder: String,
    xp_label: String,
    percentage: String,
    bar_width: String,
}

#[derive(Template)]
#[template(path = "rank_card.svg", escape = "none")]
struct SvgCardTemplate<'a> {
    card: &'a CardView,
}

#[derive(Template)]
#[template(path = "rank_card.html", escape = "none")]
struct HtmlCardTemplate<'a> {
    card: &'a CardView,
}

/// XP progress as a percentage rounded to two decimal places.
pub fn percentage(xp: f64, max_xp: f64) -> f64 {
    (xp / max_xp * 100.0 * 100.0).round() / 100.0
}

/// Width of the filled part of the SVG progress bar.
pub fn bar_width(xp: f64, max_xp: f64) -> f64 {
    xp / max_xp * BAR_TRACK_LENGTH
}

/// Renders rank cards with settings chosen at startup.
#[derive(Debug, Clone)]
pub struct CardRenderer {
    markup: MarkupKind,
    escape_user_text: bool,
}

impl CardRenderer {
    pub fn new(markup: MarkupKind, escape_user_text: bool) -> Self {
        Self {
            markup,
            escape_user_text,
        }
    }

    pub fn markup(&self) -> MarkupKind {
        self.markup
    }

    pub fn render(&self, card: &CardRequest) -> Result<RenderedArtifact, RenderError> {
        let view = self.view(card);
        let body = match self.markup {
            MarkupKind::Svg => SvgCardTemplate { card: &view }.render()?,
            MarkupKind::Html => HtmlCardTemplate { card: &view }.render()?,
        };

        Ok(RenderedArtifact {
            kind: self.markup,
            body,
        })
    }

    fn view(&self, card: &CardRequest) -> CardView {
        let xp = card.xp.0;
        let max_xp = card.max_xp.0;

        CardView {
            user_name: self.user_text(&card.user_name),
            rank_label: format!("{} #{}", self.user_text(&card.rank_text), card.rank),
            avatar: self.user_text(&card.avatar),
            avatar_border: self.color(card.avatar_border.as_deref(), DEFAULT_AVATAR_BORDER),
            bar: self.color(card.bar.as_deref(), DEFAULT_BAR),
            bar_placeholder: self.color(
                card.bar_placeholder.as_deref(),
                self.markup.default_bar_placeholder(),
            ),
            xp_label: format!("{}/{} XP", card.xp, card.max_xp),
            percentage: format!("{:.2}", percentage(xp, max_xp)),
            bar_width: format!("{:.2}", bar_width(xp, max_xp)),
        }
    }

    fn color(&self, requested: Option<&str>, default: &str) -> String {
        requested
            .map(|color| self.user_text(color))
            .unwrap_or_else(|| default.to_string())
    }

    // User text is interpolated verbatim unless escaping was enabled.
    fn user_text(&self, value: &str) -> String {
        if self.escape_user_text {
            ammonia::clean_text(value)
        } else {
            value.to_string()
        }
    }
}
