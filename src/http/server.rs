//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with a single dispatch handler
//! - Wire up middleware (tracing, limits, request ID, CORS, panic capture)
//! - Short-circuit CORS preflight
//! - Dispatch requests through the route table
//! - Observability (metrics, correlation IDs)

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Query, State},
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api::{handlers, system};
use crate::config::GatewayConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::{Endpoint, RouteTable};
use crate::security::{cors_headers, WritePolicy};
use crate::upstream::{UpstreamClient, UpstreamError};

/// Application state injected into handlers. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub routes: Arc<RouteTable>,
    pub upstream: UpstreamClient,
    pub write_policy: WritePolicy,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let upstream = UpstreamClient::new(&config.upstream, config.read_credential())?;
        let write_policy = WritePolicy::from_config(&config);

        Ok(Self {
            config: Arc::new(config),
            routes: Arc::new(RouteTable::standard()),
            upstream,
            write_policy,
        })
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let state = AppState::new(config)?;
        let config = state.config.clone();
        let router = Self::build_router(&config, state);

        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The CORS headers wrap everything so timeouts, body-limit rejections
    /// and panics carry them too.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        let mut router = Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(middleware);

        for (name, value) in cors_headers() {
            router = router.layer(SetResponseHeaderLayer::overriding(name, value));
        }

        router
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            writes_allowed = self.config.writes_allowed(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for embedding in another server.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Single entry point: preflight, route lookup, endpoint dispatch.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if method == Method::OPTIONS {
        metrics::record_request(method.as_str(), 200, "preflight", start_time);
        return response::preflight();
    }

    let endpoint = state.routes.match_path(&method, &path);
    let label = endpoint.map_or_else(|| "none".to_string(), |e| e.label());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        endpoint = %label,
        "Dispatching request"
    );

    let response = match endpoint {
        Some(endpoint) => match dispatch(&state, endpoint, request).await {
            Ok(response) => response,
            Err(err) => {
                log_failure(&request_id, &label, &err);
                err.into_response()
            }
        },
        None => {
            tracing::debug!(request_id = %request_id, path = %path, "No route matched");
            ApiError::NotFound.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), &label, start_time);
    response
}

async fn dispatch(state: &AppState, endpoint: Endpoint, request: Request<Body>) -> ApiResult<Response> {
    match endpoint {
        Endpoint::Root => Ok(system::root(state)),
        Endpoint::Health => Ok(system::health(state)),
        Endpoint::Info => Ok(system::info(state)),
        Endpoint::Stats => Ok(system::stats(state).await),
        Endpoint::List(resource) => {
            let params = Query::<HashMap<String, String>>::try_from_uri(request.uri())
                .map(|Query(p)| p)
                .unwrap_or_default();
            handlers::list(state, resource, &params).await
        }
        Endpoint::Create(resource) => {
            let body = match Bytes::from_request(request, &()).await {
                Ok(bytes) => bytes,
                // Chunked bodies hit the size limit here rather than in the layer.
                Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                    return Err(ApiError::PayloadTooLarge);
                }
                // Any other unreadable body is validated as `{}`.
                Err(rejection) => {
                    tracing::warn!(error = %rejection.body_text(), "Failed to read request body");
                    Bytes::new()
                }
            };
            handlers::create(state, resource, &body).await
        }
    }
}

fn log_failure(request_id: &str, endpoint: &str, err: &ApiError) {
    let status = err.status();
    if status.is_server_error() {
        tracing::error!(request_id, endpoint, status = %status, error = %err, "Request failed");
    } else if status == StatusCode::UNAUTHORIZED {
        tracing::warn!(request_id, endpoint, status = %status, "Write rejected");
    } else {
        tracing::debug!(request_id, endpoint, status = %status, error = %err, "Request rejected");
    }
}

/// Turn a handler panic into the standard 500 envelope.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    tracing::error!(error = %detail, "Handler panicked");
    ApiError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::headers::has_cors_headers;
    use axum::http::header::CONTENT_LENGTH;
    use tower::ServiceExt;

    fn router(config: GatewayConfig) -> Router {
        HttpServer::new(config).unwrap().into_router()
    }

    fn request(method: Method, uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn test_panic_response_keeps_message() {
        let response = panic_response(Box::new("kaboom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_response(Box::new(String::from("kaboom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_state_rejects_bad_credential() {
        let mut config = GatewayConfig::default();
        config.upstream.service_key = Some("line\nbreak".into());
        assert!(AppState::new(config).is_err());
    }

    #[tokio::test]
    async fn test_not_found_carries_cors_and_request_id() {
        let response = router(GatewayConfig::default())
            .oneshot(request(Method::GET, "/api/nope", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(has_cors_headers(response.headers()));
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_preflight_short_circuits() {
        let response = router(GatewayConfig::default())
            .oneshot(request(Method::OPTIONS, "/api/users/42", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(has_cors_headers(response.headers()));
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_create_without_key_is_unauthorized() {
        let response = router(GatewayConfig::default())
            .oneshot(request(Method::POST, "/api/users", r#"{"username":"alice"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(has_cors_headers(response.headers()));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let mut config = GatewayConfig::default();
        config.limits.max_body_size = 8;

        let response = router(config)
            .oneshot(request(Method::POST, "/api/users", r#"{"username":"alice"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(has_cors_headers(response.headers()));
    }

    fn chunked(method: Method, uri: &str, chunks: &[&'static str]) -> Request<Body> {
        let chunks: Vec<Result<Bytes, std::io::Error>> =
            chunks.iter().copied().map(|c| Ok(Bytes::from_static(c.as_bytes()))).collect();
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from_stream(futures_util::stream::iter(chunks)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_oversized_chunked_body_rejected() {
        let mut config = GatewayConfig::default();
        config.upstream.service_key = Some("service".into());
        config.limits.max_body_size = 8;

        let response = router(config)
            .oneshot(chunked(Method::POST, "/api/users", &[r#"{"username":"#, r#""alice"}"#]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(has_cors_headers(response.headers()));
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Request body too large");
    }

    #[tokio::test]
    async fn test_chunked_body_within_limit_is_read() {
        let mut config = GatewayConfig::default();
        config.upstream.service_key = Some("service".into());

        let response = router(config)
            .oneshot(chunked(Method::POST, "/api/users", &["{\"email\":", "\"a@x.io\"}"]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Username is required");
    }
}
