//! Upstream response and error types.

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::error::{ApiError, ApiResult};

/// Errors raised while talking to the data API. HTTP error statuses are not
/// errors at this level; see [`UpstreamResponse::into_data`].
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Base URL or table path could not form a URL.
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// Credential contains bytes that cannot go in a header.
    #[error("Invalid upstream credential: {0}")]
    InvalidCredential(String),

    /// Connection, timeout or body read failure.
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with an error status where a value was required.
    #[error("Upstream returned status {0}")]
    Status(StatusCode),
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// A decoded upstream reply.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// JSON body; non-JSON text is kept as a string, an empty body is null.
    pub body: Value,
    pub content_range: Option<String>,
}

impl UpstreamResponse {
    pub fn decode_body(text: String) -> Value {
        if text.is_empty() {
            return Value::Null;
        }
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    }

    pub fn is_error(&self) -> bool {
        self.status.is_client_error() || self.status.is_server_error()
    }

    /// The body on success, or an [`ApiError::Upstream`] carrying status and body.
    pub fn into_data(self) -> ApiResult<Value> {
        if self.is_error() {
            return Err(ApiError::Upstream {
                status: self.status,
                body: self.body,
            });
        }
        Ok(self.body)
    }

    /// Total row count: the `Content-Range` total when known, otherwise the
    /// number of rows in the body.
    pub fn total_count(&self) -> u64 {
        if let Some(total) = self.content_range.as_deref().and_then(parse_content_range_total) {
            return total;
        }
        match &self.body {
            Value::Array(rows) => rows.len() as u64,
            _ => 0,
        }
    }
}

/// Extract the total from a `Content-Range` value such as `0-24/3573`.
/// Returns `None` for an unknown total (`0-24/*`) or a malformed header.
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: Value, range: Option<&str>) -> UpstreamResponse {
        UpstreamResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body,
            content_range: range.map(String::from),
        }
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range_total("0-0/42"), Some(42));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-24/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
        assert_eq!(parse_content_range_total(""), None);
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(UpstreamResponse::decode_body(String::new()), Value::Null);
        assert_eq!(UpstreamResponse::decode_body("[1]".into()), json!([1]));
        assert_eq!(
            UpstreamResponse::decode_body("Bad Gateway".into()),
            json!("Bad Gateway")
        );
    }

    #[test]
    fn test_total_count_prefers_header() {
        assert_eq!(response(200, json!([{}]), Some("0-0/17")).total_count(), 17);
        assert_eq!(response(206, json!([{}, {}]), Some("0-1/*")).total_count(), 2);
        assert_eq!(response(200, json!([{}, {}, {}]), None).total_count(), 3);
        assert_eq!(response(200, json!({ "rows": 3 }), None).total_count(), 0);
    }

    #[test]
    fn test_into_data() {
        assert_eq!(
            response(201, json!([{ "id": 1 }]), None).into_data().unwrap(),
            json!([{ "id": 1 }])
        );

        let err = response(409, json!({ "code": "23505" }), None)
            .into_data()
            .unwrap_err();
        match err {
            ApiError::Upstream { status, body } => {
                assert_eq!(status, StatusCode::CONFLICT);
                assert_eq!(body["code"], "23505");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
