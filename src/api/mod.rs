//! Endpoint implementations.
//!
//! # Data Flow
//! ```text
//! Endpoint (from routing)
//!     → system.rs   root / health / info / stats
//!     → handlers.rs list / create
//!         → payload.rs   (required fields, row mapping)
//!         → upstream     (one data API call)
//!     → http::response envelope or ApiError
//! ```

pub mod handlers;
pub mod payload;
pub mod resources;
pub mod system;

pub use resources::Resource;
