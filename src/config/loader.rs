//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_BASE_URL: &str = "SUPABASE_URL";
pub const ENV_SERVICE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const ENV_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_ALLOW_PUBLIC_WRITE: &str = "ALLOW_PUBLIC_WRITE";
pub const ENV_BIND_ADDRESS: &str = "GATEWAY_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: defaults, then the optional TOML file, then the
/// process environment. The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_file(path)?,
        None => GatewayConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment values onto `config`.
///
/// `lookup` abstracts `std::env::var` so the mapping can be exercised
/// without touching the real environment.
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> GatewayConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BASE_URL) {
        config.upstream.base_url = url;
    }
    if let Some(key) = lookup(ENV_SERVICE_KEY) {
        config.upstream.service_key = Some(key);
    }
    if let Some(key) = lookup(ENV_ANON_KEY) {
        config.upstream.anon_key = Some(key);
    }
    if let Some(flag) = lookup(ENV_ALLOW_PUBLIC_WRITE) {
        config.write_policy.allow_public_write = flag.trim().eq_ignore_ascii_case("true");
    }
    if let Some(addr) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }

    // An empty key is the same as no key.
    config.upstream.service_key = config.upstream.service_key.filter(|k| !k.trim().is_empty());
    config.upstream.anon_key = config.upstream.anon_key.filter(|k| !k.trim().is_empty());

    config
}
