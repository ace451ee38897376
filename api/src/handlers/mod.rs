pub mod auth;
pub mod bulk;
pub mod fallback;
pub mod health;
pub mod metrics;
pub mod posts;
pub mod users;

// Common response types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::errors::ValidationError;
use serde::Serialize;

use crate::error::ApiError;

/// Uniform JSON body for every response, success or failure
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Standard API success response
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    envelope: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, Some(data), message)
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CREATED, Some(data), message)
    }

    fn with_status(status: StatusCode, data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            status,
            envelope: Envelope {
                success: true,
                data,
                message: message.into(),
                error: None,
            },
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, None, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

/// A required text field is missing when absent or empty.
/// Whitespace-only text counts as present.
pub fn require_fields(fields: &[(&str, Option<&str>)]) -> Result<(), ValidationError> {
    let mut missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.map_or(true, str::is_empty))
        .map(|(name, _)| name.to_string())
        .collect();

    match missing.len() {
        0 => Ok(()),
        1 => Err(ValidationError::MissingField(missing.remove(0))),
        _ => Err(ValidationError::MissingFields(missing)),
    }
}

/// Ids arrive as raw path text; one that is not an integer matches no row
pub fn parse_id(raw: &str, not_found: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::NotFound(not_found.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_require_fields_reports_single_field() {
        let err = require_fields(&[("title", Some("hello")), ("body", None)]).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("body".to_string()));
    }

    #[test]
    fn test_require_fields_treats_empty_as_missing() {
        let err = require_fields(&[("title", Some("")), ("body", None)]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec!["title".to_string(), "body".to_string()])
        );
    }

    #[test]
    fn test_parse_id_maps_garbage_to_not_found() {
        assert_eq!(parse_id("42", "Post not found").unwrap(), 42);
        let err = parse_id("abc", "Post not found").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Post not found"));
        assert!(parse_id("1.5", "Post not found").is_err());
    }

    #[test]
    fn test_success_envelope_omits_error_key() {
        let envelope = ApiResponse::ok(vec![1, 2], "loaded").envelope;
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"], serde_json::json!([1, 2]));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_message_only_envelope_omits_data_key() {
        let value = serde_json::to_value(&ApiResponse::message("done").envelope).unwrap();
        assert!(value.get("data").is_none());
        assert_eq!(value["message"], "done");
    }

    proptest! {
        #[test]
        fn property_non_blank_fields_always_pass(
            title in "[a-zA-Z0-9]{1,20}",
            body in " {0,3}[a-zA-Z0-9]{1,40}",
        ) {
            let fields = [("title", Some(title.as_str())), ("body", Some(body.as_str()))];
            prop_assert!(require_fields(&fields).is_ok());
        }

        #[test]
        fn property_whitespace_only_fields_are_present(pad in "[ \t\n]{1,10}") {
            prop_assert!(require_fields(&[("body", Some(pad.as_str()))]).is_ok());
        }
    }
}
