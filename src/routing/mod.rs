//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → matcher.rs (normalize path segments, strip `/api` mount)
//!     → router.rs (single table lookup)
//!     → Return: matched Endpoint or NoMatch
//!
//! Route Compilation (at startup):
//!     Resource catalogue
//!     → (method, path) keys
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always matches same endpoint

pub mod matcher;
pub mod router;

pub use router::{Endpoint, RouteTable};
