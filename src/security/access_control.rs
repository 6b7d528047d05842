//! Write authorization.
//!
//! Creates are forwarded only when the gateway holds the service credential
//! or the public-write override is switched on. This is a deployment guard,
//! not per-user authentication.

use crate::config::GatewayConfig;
use crate::error::{ApiError, ApiResult};

pub const WRITE_DENIED: &str =
    "Writes require SUPABASE_SERVICE_ROLE_KEY or enable ALLOW_PUBLIC_WRITE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WritePolicy {
    allowed: bool,
}

impl WritePolicy {
    pub fn from_config(config: &GatewayConfig) -> Self {
        if config.upstream.service_key.is_none() && config.write_policy.allow_public_write {
            tracing::warn!("ALLOW_PUBLIC_WRITE is enabled; writes are accepted without a service key");
        }
        Self {
            allowed: config.writes_allowed(),
        }
    }

    pub fn authorize(&self) -> ApiResult<()> {
        if self.allowed {
            Ok(())
        } else {
            Err(ApiError::Unauthorized(WRITE_DENIED.to_string()))
        }
    }
}
