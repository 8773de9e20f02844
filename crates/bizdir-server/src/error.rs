//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use bizdir_core::CoreError;
use bizdir_storage::StorageError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VERSION_CONFLICT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Server is missing required configuration (500).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Remote store unreachable, refusing, or answering with an error (500).
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// Stored document is malformed (500).
    #[error("decode error: {0}")]
    Decode(String),

    /// Lost a compare-and-swap race; the caller must resubmit (500).
    #[error("version conflict: {0}")]
    VersionConflict(String),

    /// Missing or wrong admin credential (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Referenced business does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Payload present but missing required fields (400).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Payload missing or not parseable (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// HTTP method not supported on this route (405).
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Configuration(_)
            | ApiError::RemoteUnavailable(_)
            | ApiError::Decode(_)
            | ApiError::VersionConflict(_)
            | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Configuration(_) => "CONFIGURATION_ERROR",
            ApiError::RemoteUnavailable(_) => "REMOTE_UNAVAILABLE",
            ApiError::Decode(_) => "DECODE_ERROR",
            ApiError::VersionConflict(_) => "VERSION_CONFLICT",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::Configuration(msg)
            | ApiError::RemoteUnavailable(msg)
            | ApiError::Decode(msg)
            | ApiError::VersionConflict(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Validation(msg)
            | ApiError::BadRequest(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::InternalError(msg) => msg,
        }
    }

    pub fn detail(&self) -> ApiErrorDetail {
        ApiErrorDetail {
            code: self.code().to_string(),
            message: self.message().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "success": false,
            "error": self.detail(),
        });

        (self.status(), axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            CoreError::Validation { .. } => ApiError::Validation(err.to_string()),
            CoreError::IdSpaceExhausted { .. } => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::RemoteUnavailable { .. } => ApiError::RemoteUnavailable(err.to_string()),
            StorageError::Decode { .. } => ApiError::Decode(err.to_string()),
            StorageError::VersionConflict { .. } => ApiError::VersionConflict(format!(
                "{}; re-read the directory and resubmit",
                err
            )),
            StorageError::Serialization(_) => ApiError::InternalError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdir_core::BusinessId;
    use bizdir_storage::VersionToken;

    #[test]
    fn status_mapping() {
        let cases = [
            (ApiError::Unauthorized("x".into()), 401),
            (ApiError::NotFound("x".into()), 404),
            (ApiError::Validation("x".into()), 400),
            (ApiError::BadRequest("x".into()), 400),
            (ApiError::MethodNotAllowed("x".into()), 405),
            (ApiError::VersionConflict("x".into()), 500),
            (ApiError::RemoteUnavailable("x".into()), 500),
            (ApiError::Configuration("x".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.status().as_u16(), status, "{err:?}");
        }
    }

    #[test]
    fn core_errors_convert() {
        let err = ApiError::from(CoreError::NotFound { id: BusinessId(4) });
        assert_eq!(err.code(), "NOT_FOUND");

        let err = ApiError::from(CoreError::Validation {
            reason: "name is required".into(),
        });
        assert_eq!(err.code(), "VALIDATION_ERROR");

        let err = ApiError::from(CoreError::IdSpaceExhausted {
            max: BusinessId(u64::MAX),
        });
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn storage_conflict_converts_to_version_conflict() {
        let err = ApiError::from(StorageError::VersionConflict {
            token: VersionToken::new("abc"),
        });
        assert_eq!(err.code(), "VERSION_CONFLICT");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.detail().message.contains("resubmit"));
    }
}
