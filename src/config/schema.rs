//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// External data API connection settings.
    pub upstream: UpstreamConfig,

    /// Who may create rows through the gateway.
    pub write_policy: WritePolicyConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Static metadata reported by `/health` and `/info`.
    pub service: ServiceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Credential sent on every upstream call: the service key when present,
    /// otherwise the anonymous key.
    pub fn read_credential(&self) -> Option<&str> {
        self.upstream
            .service_key
            .as_deref()
            .or(self.upstream.anon_key.as_deref())
    }

    /// Writes need the service key unless the public-write override is set.
    pub fn writes_allowed(&self) -> bool {
        self.upstream.service_key.is_some() || self.write_policy.allow_public_write
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// External data API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the hosted database (e.g., "https://xyz.supabase.co").
    pub base_url: String,

    /// Privileged key granting write access.
    pub service_key: Option<String>,

    /// Public key used for reads when no service key is configured.
    pub anon_key: Option<String>,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:54321".to_string(),
            service_key: None,
            anon_key: None,
            timeout_secs: 10,
        }
    }
}

/// Write authorization policy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WritePolicyConfig {
    /// Permit writes without a service key. Testing only.
    pub allow_public_write: bool,
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Service metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub version: String,
    pub database: String,
    pub infrastructure: String,
    pub features: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "OmniCognitor Backend".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: "Supabase (PostgreSQL)".to_string(),
            infrastructure: "omni-gateway".to_string(),
            features: vec![
                "Multi-platform AI".to_string(),
                "Workspace Management".to_string(),
                "Message Chaining".to_string(),
            ],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
