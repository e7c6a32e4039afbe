//! Request validation shared by every card endpoint.
//!
//! Each endpoint hands a [`FieldSpec`] to the same validator; the spec decides
//! which fields are required, which must be numeric or image URLs, whether
//! unknown fields are rejected and which pair of fields forms the XP range.
//! Checks run in a fixed order and stop at the first failure.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use regex::Regex;
use serde_json::{Map, Value};

/// How failures on this endpoint are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Missing or mistyped fields are plain bad requests (400).
    Lenient,
    /// Missing or mistyped fields are refused outright (403).
    Strict,
}

/// What to do with body fields the spec does not name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraFields {
    Ignore,
    Reject,
}

/// Cross-field invariant `0 <= value <= max` with `max > 0`.
#[derive(Debug, Clone, Copy)]
pub struct RangeRule {
    pub value: &'static str,
    pub max: &'static str,
}

/// Static description of what one endpoint accepts.
#[derive(Debug)]
pub struct FieldSpec {
    /// Endpoint name used in logs and metrics.
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    pub numeric: &'static [&'static str],
    pub image_urls: &'static [&'static str],
    pub extra_fields: ExtraFields,
    pub range: Option<RangeRule>,
    pub accept_form: bool,
    pub strictness: Strictness,
}

impl FieldSpec {
    fn known_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.required.iter().chain(self.optional.iter()).copied()
    }

    fn is_known(&self, name: &str) -> bool {
        self.known_fields().any(|known| known == name)
    }

    fn is_numeric(&self, name: &str) -> bool {
        self.numeric.contains(&name)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Unsupported Media Type")]
    UnsupportedMediaType,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Missing required field: {field}")]
    MissingField {
        field: &'static str,
        required: &'static [&'static str],
    },

    #[error("Field '{field}' must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Field '{0}' must be an http(s) URL pointing to a png, jpg, gif or webp image")]
    InvalidFormat(&'static str),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("{field} ({value}) must be between 0 and {max_field} ({max})")]
    RangeViolation {
        field: &'static str,
        max_field: &'static str,
        value: f64,
        max: f64,
    },
}

impl ValidationError {
    /// HTTP status for this failure under the endpoint's strictness.
    pub fn status(&self, strictness: Strictness) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::MalformedBody(_) | Self::RangeViolation { .. } => StatusCode::BAD_REQUEST,
            Self::MissingField { .. } | Self::InvalidType { .. } => match strictness {
                Strictness::Lenient => StatusCode::BAD_REQUEST,
                Strictness::Strict => StatusCode::FORBIDDEN,
            },
            Self::InvalidFormat(_) => StatusCode::FORBIDDEN,
            Self::UnknownField(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Field the failure is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field, .. }
            | Self::InvalidType { field, .. }
            | Self::RangeViolation { field, .. } => Some(*field),
            Self::InvalidFormat(field) => Some(*field),
            Self::UnknownField(field) => Some(field.as_str()),
            _ => None,
        }
    }
}

/// A single normalized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

/// Fields that passed validation, keyed by the names the spec declares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedFields {
    values: BTreeMap<&'static str, FieldValue>,
}

impl ValidatedFields {
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FieldValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(FieldValue::Number(number)) => Some(*number),
            _ => None,
        }
    }

    pub fn require_text(&self, name: &'static str) -> Result<&str, ValidationError> {
        self.text(name).ok_or(ValidationError::InvalidType {
            field: name,
            expected: "a string",
        })
    }

    pub fn require_number(&self, name: &'static str) -> Result<f64, ValidationError> {
        self.number(name).ok_or(ValidationError::InvalidType {
            field: name,
            expected: "a number",
        })
    }
}

/// Body encodings the validator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
}

/// Run every check against an inbound request.
///
/// The body is only read once the method and content type are acceptable.
pub async fn validate_request(
    request: Request<Body>,
    spec: &FieldSpec,
    body_limit: usize,
) -> Result<ValidatedFields, ValidationError> {
    check_method(request.method())?;
    let kind = body_kind(request.headers(), spec)?;

    let bytes = axum::body::to_bytes(request.into_body(), body_limit)
        .await
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;

    let body = parse_body(kind, &bytes)?;
    validate(&body, spec)
}

pub fn check_method(method: &Method) -> Result<(), ValidationError> {
    if method == Method::POST {
        Ok(())
    } else {
        Err(ValidationError::MethodNotAllowed)
    }
}

fn body_kind(headers: &HeaderMap, spec: &FieldSpec) -> Result<BodyKind, ValidationError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "application/json" => Ok(BodyKind::Json),
        "application/x-www-form-urlencoded" if spec.accept_form => Ok(BodyKind::Form),
        _ => Err(ValidationError::UnsupportedMediaType),
    }
}

fn parse_body(kind: BodyKind, bytes: &[u8]) -> Result<Map<String, Value>, ValidationError> {
    match kind {
        BodyKind::Json => match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ValidationError::MalformedBody(
                "expected a JSON object".to_string(),
            )),
            Err(e) => Err(ValidationError::MalformedBody(e.to_string())),
        },
        BodyKind::Form => Ok(url::form_urlencoded::parse(bytes)
            .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
            .collect()),
    }
}

/// Validate an already parsed body against a spec.
pub fn validate(
    body: &Map<String, Value>,
    spec: &FieldSpec,
) -> Result<ValidatedFields, ValidationError> {
    if let Some(field) = spec
        .required
        .iter()
        .copied()
        .find(|name| is_blank(body.get(*name)))
    {
        return Err(ValidationError::MissingField {
            field,
            required: spec.required,
        });
    }

    let mut values = BTreeMap::new();
    for name in spec.known_fields() {
        let raw = match body.get(name) {
            Some(raw) if !is_blank(Some(raw)) => raw,
            _ => continue,
        };

        let value = if spec.is_numeric(name) {
            parse_number(raw)
                .map(FieldValue::Number)
                .ok_or(ValidationError::InvalidType {
                    field: name,
                    expected: "a number",
                })?
        } else {
            parse_text(raw)
                .map(FieldValue::Text)
                .ok_or(ValidationError::InvalidType {
                    field: name,
                    expected: "a string",
                })?
        };
        values.insert(name, value);
    }

    for name in spec.image_urls.iter().copied() {
        if let Some(FieldValue::Text(url)) = values.get(name) {
            if !is_image_url(url) {
                return Err(ValidationError::InvalidFormat(name));
            }
        }
    }

    if spec.extra_fields == ExtraFields::Reject {
        if let Some(unknown) = body.keys().find(|key| !spec.is_known(key)) {
            return Err(ValidationError::UnknownField(unknown.clone()));
        }
    }

    let fields = ValidatedFields { values };

    if let Some(rule) = spec.range {
        let value = fields.require_number(rule.value)?;
        let max = fields.require_number(rule.max)?;
        if max <= 0.0 || value < 0.0 || value > max {
            return Err(ValidationError::RangeViolation {
                field: rule.value,
                max_field: rule.max,
                value,
                max,
            });
        }
    }

    Ok(fields)
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn parse_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn image_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^https?://\S+\.(?:png|jpe?g|gif|webp)(?:\?\S*)?$")
            .expect("image URL pattern is a valid regex")
    })
}

/// Whether `url` is an http(s) URL whose path ends in a known image extension.
pub fn is_image_url(url: &str) -> bool {
    image_url_pattern().is_match(url)
}
