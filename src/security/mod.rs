//! Security subsystem.
//!
//! # Components
//! - headers.rs: static CORS headers for every response
//! - access_control.rs: write authorization policy
//!
//! Body size limits are enforced by the HTTP layer from `limits.max_body_size`.

pub mod access_control;
pub mod headers;

pub use access_control::WritePolicy;
pub use headers::cors_headers;
