use serde::Deserialize;
use thiserror::Error;

use crate::models::FieldErrors;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        details: FieldErrors,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body returned by the accounts API
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: String,
    #[serde(default)]
    details: Option<FieldErrors>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let payload = serde_json::from_str::<ErrorPayload>(body).ok();
        let message = match payload {
            Some(ref p) => p.error.clone(),
            None => Self::truncate_body(body),
        };

        match status.as_u16() {
            400 => ApiError::Validation {
                message: if message.is_empty() {
                    "Validation failed".to_string()
                } else {
                    message
                },
                details: payload.and_then(|p| p.details).unwrap_or_default(),
            },
            401 => ApiError::Unauthorized {
                message: if message.is_empty() {
                    "token may be expired".to_string()
                } else {
                    message
                },
            },
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Field-level messages reported by the server, if any
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation { details, .. } if !details.is_empty() => Some(details),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_validation_payload_with_details() {
        let body = r#"{"error": "Validation failed", "details": {"mobile": ["Mobile number must be 10 digits"]}}"#;
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, body);

        assert_eq!(err.to_string(), "Validation failed");
        let details = err.field_errors().expect("details present");
        assert_eq!(details.first("mobile"), Some("Mobile number must be 10 digits"));
    }

    #[test]
    fn test_validation_payload_without_details() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error": "Email already exists"}"#);
        assert_eq!(err.to_string(), "Email already exists");
        assert!(err.field_errors().is_none());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized_keeps_server_message() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"error": "Invalid credentials"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Unauthorized: Invalid credentials");

        // DRF's own 401 body has no `error` member
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "");
        assert_eq!(err.to_string(), "Unauthorized: token may be expired");
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(ref m) if m == "nope"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>"),
            ApiError::ServerError(ref m) if m == "<html>"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(ref m) if m.starts_with("Status 418")
        ));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let message = err.to_string();
        assert!(message.contains("truncated, 2000 total bytes"));
        assert!(message.len() < 600);

        // Truncation never splits a multi-byte character
        let body = "é".repeat(400);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("truncated, 800 total bytes"));
    }
}
