//! Service error types with HTTP status code mapping.
//!
//! [`RankerError`] is the central error type for the service. Each variant
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
///     "code": 3002,
///     "message": "source fetch failed: playlist PLx not found",
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
    /// Numeric error code.
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
/// | Range     | Category         | HTTP Status       |
/// |-----------|------------------|-------------------|
/// | 1000–1999 | Validation       | 400 Bad Request   |
/// | 3000–3999 | Server/Ingestion | 500 / 502         |
#[derive(Debug, thiserror::Error)]
pub enum RankerError {
    /// Request carried an unusable parameter or configuration value.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The upstream metadata API returned a network error or non-2xx status.
    #[error("source fetch failed: {0}")]
    SourceFetch(String),

    /// A statistics entry had no catalog counterpart in its page.
    #[error("statistics entry {video_id} has no catalog entry")]
    JoinIntegrity {
        /// Video identity present in statistics but absent from the catalog.
        video_id: String,
    },

    /// A required numeric field could not be parsed from the source payload.
    #[error("mapping failed: {0}")]
    Mapping(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RankerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::SourceFetch(_) => 3002,
            Self::JoinIntegrity { .. } => 3003,
            Self::Mapping(_) => 3004,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::SourceFetch(_) => StatusCode::BAD_GATEWAY,
            Self::JoinIntegrity { .. }
            | Self::Mapping(_)
            | Self::PersistenceError(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RankerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
