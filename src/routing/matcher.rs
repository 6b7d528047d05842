//! Path normalization.
//!
//! # Responsibilities
//! - Split a request path into non-empty segments
//! - Strip any mount prefix up to and including the first `api` segment
//! - Produce the lookup key used by the route table (first segment only)
//!
//! # Design Decisions
//! - Matching is case-sensitive
//! - Only the first `api` segment is treated as the mount point
//! - No regex to guarantee O(n) matching

/// Segment that marks where the gateway's own routes begin.
pub const MOUNT_SEGMENT: &str = "api";

/// Returns the path segments the route table cares about.
///
/// `/api/users`, `/functions/v1/api/users` and `/users/` all yield `["users"]`.
pub fn normalize_segments(path: &str) -> Vec<&str> {
    let raw: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match raw.iter().position(|s| *s == MOUNT_SEGMENT) {
        Some(idx) => raw[idx + 1..].to_vec(),
        None => raw,
    }
}

/// The route table key: the first normalized segment ("" for the root).
/// Trailing segments are ignored, so `/users/42` resolves like `/users`.
pub fn route_key<'a>(segments: &[&'a str]) -> &'a str {
    segments.first().copied().unwrap_or("")
}
