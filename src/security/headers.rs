//! CORS response headers.
//!
//! The gateway answers browsers from any origin. The same static set is
//! attached to every response, errors included, and is the whole reply to
//! an OPTIONS preflight.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

pub fn cors_headers() -> [(HeaderName, HeaderValue); 3] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ),
    ]
}

/// True when `headers` carries the full CORS set.
pub fn has_cors_headers(headers: &HeaderMap) -> bool {
    cors_headers()
        .iter()
        .all(|(name, value)| headers.get(name) == Some(value))
}
