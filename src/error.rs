//! Gateway error taxonomy and its JSON envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Every way a request can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field was missing or empty.
    #[error("{0}")]
    Validation(String),

    /// A write was attempted without a write credential.
    #[error("{0}")]
    Unauthorized(String),

    /// The data API answered 4xx/5xx. Status and body pass through.
    #[error("upstream returned {status}")]
    Upstream { status: StatusCode, body: Value },

    /// The request body exceeded `limits.max_body_size`.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// No route for this method + path.
    #[error("Not found")]
    NotFound,

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Upstream { status, .. } => *status,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `error` field of the envelope.
    fn detail(&self) -> Value {
        match self {
            ApiError::Upstream { body, .. } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({ "success": false, "error": self.detail() });
        (status, Json(body)).into_response()
    }
}
