use crate::errors::internal::{ErrorKind, InternalError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for employee and KYC endpoints
#[derive(Object, Debug)]
pub struct ApiErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,

    /// Whether repeating the same request may succeed
    pub retryable: bool,
}

/// Lifecycle API error types
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Input failed validation
    #[oai(status = 400)]
    BadRequest(Json<ApiErrorResponse>),

    /// Missing or invalid bearer token
    #[oai(status = 401)]
    Unauthorized(Json<ApiErrorResponse>),

    /// Caller role may not perform this operation
    #[oai(status = 403)]
    Forbidden(Json<ApiErrorResponse>),

    /// Employee or KYC submission not found
    #[oai(status = 404)]
    NotFound(Json<ApiErrorResponse>),

    /// Lost a uniqueness race; safe to retry
    #[oai(status = 409)]
    Conflict(Json<ApiErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ApiErrorResponse>),
}

impl ApiError {
    fn body(error: &str, message: impl Into<String>, status_code: u16, retryable: bool) -> Json<ApiErrorResponse> {
        Json(ApiErrorResponse {
            error: error.to_string(),
            message: message.into(),
            status_code,
            retryable,
        })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(Self::body("validation_failed", message, 400, false))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(Self::body("unauthorized", message, 401, false))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(Self::body("forbidden", message, 403, false))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(Self::body("not_found", message, 404, false))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(Self::body("conflict", message, 409, true))
    }

    /// Always returns a generic message without exposing internal details
    fn internal_server_error() -> Self {
        ApiError::InternalError(Self::body("internal_error", "An internal error occurred", 500, false))
    }

    /// Convert InternalError to ApiError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match err.kind() {
            ErrorKind::Validation => Self::bad_request(err.to_string()),
            ErrorKind::NotFound => Self::not_found(err.to_string()),
            ErrorKind::Forbidden => Self::forbidden(err.to_string()),
            ErrorKind::Unauthorized => {
                tracing::debug!("Rejected request: {}", err);
                Self::unauthorized("Authentication required")
            }
            ErrorKind::Conflict => {
                tracing::warn!("Uniqueness conflict, caller may retry: {}", err);
                Self::conflict("The request conflicted with a concurrent change, please retry")
            }
            ErrorKind::Internal => {
                tracing::error!("Internal error in lifecycle operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    fn response(&self) -> &ApiErrorResponse {
        match self {
            ApiError::BadRequest(json)
            | ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::Conflict(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
