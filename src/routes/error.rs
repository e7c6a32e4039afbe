use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::services::pipeline::PipelineError;
use crate::services::render::RenderError;
use crate::services::validation::{FieldSpec, Strictness, ValidationError};

/// JSON error envelope returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<&'static [&'static str]>,
}

/// Every way a request can fail, converted to a response at the handler boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{error}")]
    Validation {
        error: ValidationError,
        strictness: Strictness,
    },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    Unhandled(String),
}

impl ApiError {
    pub fn validation(error: ValidationError, spec: &FieldSpec) -> Self {
        Self::Validation {
            error,
            strictness: spec.strictness,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { error, strictness } => error.status(*strictness),
            Self::Pipeline(_) | Self::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used as the metrics outcome.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { error, .. } => match error {
                ValidationError::MethodNotAllowed => "method_not_allowed",
                ValidationError::UnsupportedMediaType => "unsupported_media_type",
                ValidationError::MalformedBody(_) => "malformed_body",
                ValidationError::MissingField { .. } => "missing_field",
                ValidationError::InvalidType { .. } => "invalid_type",
                ValidationError::InvalidFormat(_) => "invalid_format",
                ValidationError::UnknownField(_) => "unknown_field",
                ValidationError::RangeViolation { .. } => "range_violation",
            },
            Self::Pipeline(PipelineError::Render(_)) => "upstream_render_failure",
            Self::Pipeline(PipelineError::Source(_)) => "upstream_source_failure",
            Self::Pipeline(PipelineError::Hosting(_)) => "upstream_hosting_failure",
            Self::Unhandled(_) => "unhandled",
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Validation { error, .. } => ErrorBody {
                error: error.to_string(),
                message: None,
                field: error.field().map(str::to_string),
                required: match error {
                    ValidationError::MissingField { required, .. } => Some(*required),
                    _ => None,
                },
            },
            Self::Pipeline(pipeline) => {
                let (label, detail) = match pipeline {
                    PipelineError::Render(e) => ("Upstream render failure", e.to_string()),
                    PipelineError::Source(e) => ("Upstream source failure", e.clone()),
                    PipelineError::Hosting(e) => ("Upstream hosting failure", e.to_string()),
                };
                ErrorBody {
                    error: label.to_string(),
                    message: Some(detail),
                    field: None,
                    required: None,
                }
            }
            Self::Unhandled(message) => ErrorBody {
                error: "Internal Server Error".to_string(),
                message: Some(message.clone()),
                field: None,
                required: None,
            },
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(e: RenderError) -> Self {
        Self::Unhandled(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(kind = self.kind(), error = %self, "Request failed");
        } else {
            warn!(kind = self.kind(), error = %self, "Request rejected");
        }

        if let Self::Validation {
            error: ValidationError::MethodNotAllowed,
            ..
        } = self
        {
            return (status, [(header::ALLOW, "POST")], "Method Not Allowed").into_response();
        }

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::image_host::ImageHostError;
    use crate::services::validation::ExtraFields;

    const STRICT: FieldSpec = FieldSpec {
        name: "test",
        required: &["name", "icon"],
        optional: &[],
        numeric: &[],
        image_urls: &["icon"],
        extra_fields: ExtraFields::Reject,
        range: None,
        accept_form: false,
        strictness: Strictness::Strict,
    };

    #[test]
    fn test_missing_field_body_lists_required() {
        let err = ApiError::validation(
            ValidationError::MissingField {
                field: "icon",
                required: STRICT.required,
            },
            &STRICT,
        );
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["error"], "Missing required field: icon");
        assert_eq!(body["field"], "icon");
        assert_eq!(body["required"], serde_json::json!(["name", "icon"]));
        assert!(body.get("message").is_none());
    }

    #[test]
    fn test_hosting_failure_is_server_error() {
        let err = ApiError::from(PipelineError::Hosting(ImageHostError::MissingUrl));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), "upstream_hosting_failure");

        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["error"], "Upstream hosting failure");
        assert_eq!(body["message"], "Image host response did not include a URL");
    }

    #[test]
    fn test_method_not_allowed_is_plain_text() {
        let response = ApiError::validation(ValidationError::MethodNotAllowed, &STRICT)
            .into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "POST");
    }
}
