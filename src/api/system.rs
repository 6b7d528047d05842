//! Service-level endpoints: root listing, health, info and table stats.

use std::collections::{BTreeMap, BTreeSet};

use axum::response::Response;
use chrono::{SecondsFormat, Utc};
use futures_util::future::join_all;
use serde_json::json;

use crate::api::resources::Resource;
use crate::http::response;
use crate::http::server::AppState;
use crate::routing::matcher::MOUNT_SEGMENT;

/// `GET /` - lists the routes the gateway serves.
pub fn root(state: &AppState) -> Response {
    let available: Vec<String> = state
        .routes
        .routes()
        .into_iter()
        .filter(|(_, path, _)| !path.is_empty())
        .map(|(_, path, _)| format!("/{}/{}", MOUNT_SEGMENT, path))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    response::ok_fields(json!({
        "message": format!("API root. Available: {}", available.join(", ")),
        "routes": available,
    }))
}

/// `GET /health`
pub fn health(state: &AppState) -> Response {
    let service = &state.config.service;
    response::ok_fields(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "service": service.name,
        "version": service.version,
        "infrastructure": service.infrastructure,
    }))
}

/// `GET /info`
pub fn info(state: &AppState) -> Response {
    let service = &state.config.service;
    response::ok_fields(json!({
        "name": service.name,
        "version": service.version,
        "status": "running",
        "database": service.database,
        "features": service.features,
        "infrastructure": service.infrastructure,
    }))
}

/// `GET /stats` - row count per upstream table.
///
/// Counts run concurrently. A table whose count fails reports 0; the
/// failure is logged but never fails the request.
pub async fn stats(state: &AppState) -> Response {
    let counts = join_all(Resource::tables().map(|table| async move {
        let count = match state.upstream.count(table).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(table, error = %e, "Count failed, reporting 0");
                0
            }
        };
        (table, count)
    }))
    .await;

    let stats: BTreeMap<&str, u64> = counts.into_iter().collect();
    response::ok_fields(json!({ "stats": stats }))
}
