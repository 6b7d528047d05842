//! REST client for the external data API.
//!
//! # Responsibilities
//! - Attach the configured credential to every call
//! - Select, insert and count rows in a named table
//! - Decode replies without judging their status (callers decide)

use std::time::Duration;

use axum::http::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use serde_json::Value;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::types::{UpstreamError, UpstreamResponse, UpstreamResult};

const REST_PATH: &str = "rest/v1";

/// Filters and modifiers for a table read.
#[derive(Debug, Clone)]
pub struct TableQuery {
    params: Vec<(String, String)>,
}

impl TableQuery {
    /// `select=*` with no other modifiers.
    pub fn all() -> Self {
        Self {
            params: vec![("select".to_string(), "*".to_string())],
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    /// Equality filter on `column`.
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Data API client. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    rest_root: Url,
}

impl UpstreamClient {
    /// Build a client for `config`, authenticating with `credential` if given.
    pub fn new(config: &UpstreamConfig, credential: Option<&str>) -> UpstreamResult<Self> {
        let base = config.base_url.trim_end_matches('/');
        let rest_root = Url::parse(&format!("{}/{}/", base, REST_PATH))
            .map_err(|e| UpstreamError::InvalidUrl(format!("'{}': {}", config.base_url, e)))?;

        let mut headers = HeaderMap::new();
        if let Some(key) = credential {
            let mut apikey = HeaderValue::from_str(key)
                .map_err(|e| UpstreamError::InvalidCredential(e.to_string()))?;
            apikey.set_sensitive(true);
            let mut bearer = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| UpstreamError::InvalidCredential(e.to_string()))?;
            bearer.set_sensitive(true);

            headers.insert("apikey", apikey);
            headers.insert(AUTHORIZATION, bearer);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        tracing::debug!(
            rest_root = %rest_root,
            authenticated = credential.is_some(),
            "Upstream client initialized"
        );

        Ok(Self { http, rest_root })
    }

    /// URL of `table` under the REST root.
    pub fn table_url(&self, table: &str) -> UpstreamResult<Url> {
        self.rest_root
            .join(table)
            .map_err(|e| UpstreamError::InvalidUrl(format!("table '{}': {}", table, e)))
    }

    /// `GET /rest/v1/<table>?<query>`
    pub async fn select(&self, table: &str, query: &TableQuery) -> UpstreamResult<UpstreamResponse> {
        let request = self.http.get(self.table_url(table)?).query(query.params());
        self.send(table, "select", request).await
    }

    /// `POST /rest/v1/<table>` returning the inserted representation.
    pub async fn insert(&self, table: &str, row: &Value) -> UpstreamResult<UpstreamResponse> {
        let request = self
            .http
            .post(self.table_url(table)?)
            .header("Prefer", "return=representation")
            .json(row);
        self.send(table, "insert", request).await
    }

    /// Exact row count of `table`. Error statuses become [`UpstreamError::Status`].
    pub async fn count(&self, table: &str) -> UpstreamResult<u64> {
        let request = self
            .http
            .get(self.table_url(table)?)
            .query(TableQuery::all().limit(1).params())
            .header("Prefer", "count=exact");
        let response = self.send(table, "count", request).await?;

        if response.is_error() {
            return Err(UpstreamError::Status(response.status));
        }
        Ok(response.total_count())
    }

    async fn send(
        &self,
        table: &str,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> UpstreamResult<UpstreamResponse> {
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(table, operation, error = %e, "Upstream request failed");
                metrics::record_upstream_error(table, operation);
                return Err(e.into());
            }
        };

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let content_range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let text = response.text().await?;

        tracing::debug!(table, operation, status = %status, "Upstream responded");
        metrics::record_upstream(table, operation, status.as_u16());
        if status.is_client_error() || status.is_server_error() {
            metrics::record_upstream_error(table, operation);
        }

        Ok(UpstreamResponse {
            status,
            body: UpstreamResponse::decode_body(text),
            content_range,
        })
    }
}
