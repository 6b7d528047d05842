//! Success envelopes.
//!
//! Every JSON body carries `success`. Errors are rendered by
//! [`ApiError`](crate::error::ApiError); this module covers the happy path.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

/// `{"success": true, "data": data}`
pub fn data(status: StatusCode, data: Value) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

/// `fields` with `"success": true` merged in. Non-object values are wrapped
/// under `data`.
pub fn ok_fields(fields: Value) -> Response {
    match fields {
        Value::Object(map) => (StatusCode::OK, Json(with_success(map))).into_response(),
        other => data(StatusCode::OK, other),
    }
}

fn with_success(fields: Map<String, Value>) -> Value {
    let mut body = Map::with_capacity(fields.len() + 1);
    body.insert("success".to_string(), Value::Bool(true));
    body.extend(fields);
    Value::Object(body)
}

/// Plain-text reply to an OPTIONS preflight.
pub fn preflight() -> Response {
    (StatusCode::OK, "ok").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_success_keeps_fields() {
        let body = match json!({ "status": "ok", "version": "1" }) {
            Value::Object(map) => with_success(map),
            _ => unreachable!(),
        };
        assert_eq!(body, json!({ "success": true, "status": "ok", "version": "1" }));
    }

    #[test]
    fn test_statuses() {
        assert_eq!(data(StatusCode::CREATED, json!([])).status(), StatusCode::CREATED);
        assert_eq!(ok_fields(json!({})).status(), StatusCode::OK);
        assert_eq!(preflight().status(), StatusCode::OK);
    }
}
