//! External data API subsystem.
//!
//! # Data Flow
//! ```text
//! handler
//!     → client.rs (build URL + query, attach credential)
//!     → reqwest round trip
//!     → types.rs (decode body, Content-Range total)
//!     → UpstreamResponse (status judged by the caller)
//! ```
//!
//! # Design Decisions
//! - One call per handler; no retries
//! - Error statuses are data, not errors, so they can pass through verbatim
//! - Transport failures surface as `UpstreamError::Transport`

pub mod client;
pub mod types;

pub use client::{TableQuery, UpstreamClient};
pub use types::{UpstreamError, UpstreamResponse, UpstreamResult};
