//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the backend. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1201,
///     "message": "you are not a member of this group",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges below).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category                 | HTTP Status               |
/// |-----------|--------------------------|---------------------------|
/// | 1000–1099 | Validation               | 400 Bad Request           |
/// | 1100–1199 | Authentication           | 401 Unauthorized          |
/// | 1200–1299 | Authorization            | 403 Forbidden             |
/// | 2000–2099 | Not Found                | 404 Not Found             |
/// | 2100–2199 | Conflict                 | 409 Conflict              |
/// | 3000–3999 | Server                   | 500 Internal Server Error |
/// | 4000–4999 | Upstream (AI completion) | 502 Bad Gateway           |
///
/// Database and internal failures never expose their underlying message to
/// the client; the detail is logged server-side and the response carries a
/// fixed generic text.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or out-of-range input (bad amount, unknown category, CSV
    /// schema mismatch, AI output failing field constraints).
    #[error("invalid request: {0}")]
    Validation(String),

    /// Missing or invalid credential.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but lacking the required group role or membership.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Missing resource, or a resource the caller may not know exists.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate email, already-a-member, and similar state clashes.
    #[error("conflict: {0}")]
    Conflict(String),

    /// AI gateway network failure, timeout, or non-2xx reply.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// Persistence layer failure.
    #[error("database error: {0}")]
    Database(String),

    /// Any other internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::Unauthorized(_) => 1101,
            Self::Forbidden(_) => 1201,
            Self::NotFound(_) => 2001,
            Self::Conflict(_) => 2101,
            Self::Database(_) => 3001,
            Self::Internal(_) => 3000,
            Self::Upstream(_) => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Returns the caller-facing message for this variant.
    ///
    /// Server-side failures are replaced by a fixed generic text so that
    /// internal detail never leaks to clients.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.client_message(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Upstream("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_does_not_leak() {
        let err = ApiError::Database("connection refused on 10.0.0.3".into());
        assert_eq!(err.client_message(), "internal server error");

        let err = ApiError::Conflict("email already registered".into());
        assert!(err.client_message().contains("email already registered"));
    }

    #[test]
    fn sqlx_errors_become_database_errors() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::Database(_)));
    }
}
