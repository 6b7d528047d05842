//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, endpoint
//! - `gateway_request_duration_seconds` (histogram): latency by endpoint
//! - `gateway_upstream_requests_total` (counter): data API calls by table, operation, status
//! - `gateway_upstream_errors_total` (counter): data API calls that failed in transport or answered 4xx/5xx
//!
//! Without an installed recorder every call here is a no-op, so tests and
//! embedded use need no setup.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed inbound request.
pub fn record_request(method: &str, status: u16, endpoint: &str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "endpoint" => endpoint.to_string()
    )
    .increment(1);

    histogram!(
        "gateway_request_duration_seconds",
        "endpoint" => endpoint.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one data API round trip that produced a response.
pub fn record_upstream(table: &str, operation: &'static str, status: u16) {
    counter!(
        "gateway_upstream_requests_total",
        "table" => table.to_string(),
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a data API call that failed in transport or answered 4xx/5xx.
pub fn record_upstream_error(table: &str, operation: &'static str) {
    counter!(
        "gateway_upstream_errors_total",
        "table" => table.to_string(),
        "operation" => operation
    )
    .increment(1);
}
