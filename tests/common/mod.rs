//! Shared utilities for integration testing: a recording mock of the data
//! API and a gateway bound to an ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use omni_gateway::config::GatewayConfig;
use omni_gateway::http::HttpServer;
use omni_gateway::lifecycle::Shutdown;
use omni_gateway_sdk::GatewayClient;
use serde_json::Value;
use tokio::net::TcpListener;

/// One request as the mock upstream saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Whether the query string contains `key=value` verbatim.
    pub fn has_param(&self, key: &str, value: &str) -> bool {
        let wanted = format!("{}={}", key, value);
        self.query.split('&').any(|pair| pair == wanted)
    }
}

/// What the mock returns for a request.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: Value,
    pub content_range: Option<String>,
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            content_range: None,
            delay: None,
        }
    }

    pub fn counted(total: u64) -> Self {
        Self {
            content_range: Some(format!("0-0/{}", total)),
            ..Self::json(200, Value::Array(vec![]))
        }
    }

    /// Holds the reply well past any client timeout used in tests.
    pub fn stalled() -> Self {
        Self {
            delay: Some(Duration::from_secs(30)),
            ..Self::json(200, Value::Array(vec![]))
        }
    }
}

type Responder = Arc<dyn Fn(&Recorded) -> MockReply + Send + Sync>;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    responder: Responder,
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("mock upstream saw no requests")
    }
}

/// Start a programmable mock of the data API on an ephemeral port.
pub async fn start_mock_upstream<F>(responder: F) -> MockUpstream
where
    F: Fn(&Recorded) -> MockReply + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        requests: requests.clone(),
        responder: Arc::new(responder),
    };

    let app = Router::new()
        .route("/{*path}", any(mock_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, requests }
}

async fn mock_handler(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        headers,
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };

    let reply = (state.responder)(&recorded);
    state.requests.lock().unwrap().push(recorded);

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(reply.status).unwrap();
    let mut response = (status, Json(reply.body)).into_response();
    if let Some(range) = reply.content_range {
        response
            .headers_mut()
            .insert("content-range", HeaderValue::from_str(&range).unwrap());
    }
    response
}

/// Config pointing at `upstream_url` with a service key, so writes are allowed.
pub fn config_for(upstream_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.upstream.base_url = upstream_url.to_string();
    config.upstream.service_key = Some("test-service-key".into());
    config.observability.metrics_enabled = false;
    config
}

/// A running gateway. Dropping it stops the server.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> GatewayClient {
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .unwrap();
        GatewayClient::with_client(&self.base_url(), http)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let server = HttpServer::new(config).expect("gateway config should be valid");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway { addr, shutdown }
}
