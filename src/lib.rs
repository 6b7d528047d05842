//! JSON gateway in front of a hosted database REST API.
//!
//! Requests are matched against a fixed `(method, path)` table and each
//! endpoint makes one call to the data API (`/rest/v1/<table>`), wrapping the
//! result in a `{ "success": ..., ... }` envelope with permissive CORS.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
