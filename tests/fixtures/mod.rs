//! Request payloads shared by the API tests

use serde_json::{json, Value};

/// Smallest byte string the image sniffer recognizes as a PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

/// Rank card for the local renderer.
pub fn rank_card() -> Value {
    json!({
        "user_name": "Ann",
        "rank_text": "Level",
        "rank": 3,
        "avatar": "https://x/a.png",
        "xp": 40,
        "max_xp": 100
    })
}

/// Level card for the upstream renderer.
pub fn level_card() -> Value {
    json!({
        "name": "Ann",
        "level": 7,
        "xp": 40,
        "xp_required": 100,
        "rank": 3,
        "icon": "https://cdn.example.com/avatars/ann.png"
    })
}

/// Copy of `payload` with `field` replaced.
pub fn with(payload: Value, field: &str, value: Value) -> Value {
    let mut payload = payload;
    payload[field] = value;
    payload
}

/// Copy of `payload` without `field`.
pub fn without(payload: Value, field: &str) -> Value {
    let mut payload = payload;
    if let Some(map) = payload.as_object_mut() {
        map.remove(field);
    }
    payload
}
