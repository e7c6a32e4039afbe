//! Field specifications for each public endpoint.

use crate::services::validation::{ExtraFields, FieldSpec, RangeRule, Strictness};

/// POST /api/v1/card — locally rendered rank card.
pub const RANK_CARD: FieldSpec = FieldSpec {
    name: "card",
    required: &["user_name", "rank", "rank_text", "avatar", "xp", "max_xp"],
    optional: &["avatar_border", "bar", "bar_placeholder"],
    numeric: &["rank", "xp", "max_xp"],
    image_urls: &[],
    extra_fields: ExtraFields::Ignore,
    range: Some(RangeRule {
        value: "xp",
        max: "max_xp",
    }),
    accept_form: false,
    strictness: Strictness::Lenient,
};

/// POST /api/v1/level-card — rendered upstream, then rehosted.
pub const LEVEL_CARD: FieldSpec = FieldSpec {
    name: "level_card",
    required: &["name", "level", "xp", "xp_required", "rank", "icon"],
    optional: &[],
    numeric: &["level", "xp", "xp_required", "rank"],
    image_urls: &["icon"],
    extra_fields: ExtraFields::Reject,
    range: Some(RangeRule {
        value: "xp",
        max: "xp_required",
    }),
    accept_form: false,
    strictness: Strictness::Strict,
};

/// POST /api/v1/rehost — copy an existing image to the image host.
pub const REHOST: FieldSpec = FieldSpec {
    name: "rehost",
    required: &["url"],
    optional: &[],
    numeric: &[],
    image_urls: &["url"],
    extra_fields: ExtraFields::Reject,
    range: None,
    accept_form: false,
    strictness: Strictness::Strict,
};

/// POST /api/v1/chat — canned chat replies.
pub const CHAT: FieldSpec = FieldSpec {
    name: "chat",
    required: &["content", "bio"],
    optional: &["personality", "prompt", "memories"],
    numeric: &[],
    image_urls: &[],
    extra_fields: ExtraFields::Ignore,
    range: None,
    accept_form: true,
    strictness: Strictness::Lenient,
};
