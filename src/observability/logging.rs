//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level when set

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for `level`: this crate at `level`, HTTP middleware at debug
/// only when the gateway itself is at debug or trace.
pub fn default_filter(level: &str) -> String {
    let tower_level = match level {
        "trace" | "debug" => "debug",
        _ => "info",
    };
    format!("omni_gateway={},tower_http={}", level, tower_level)
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
