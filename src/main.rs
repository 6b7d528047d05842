//! omni-gateway
//!
//! ```text
//!     Client Request
//!     ───────────────▶ http::server ──▶ routing ──▶ api handlers ──▶ upstream ──▶ Data API
//!                           │                                            │
//!     Client Response       ▼                                            ▼
//!     ◀─────────────── CORS + request id ◀──── JSON envelope ◀──── status/body
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use omni_gateway::config::load_config;
use omni_gateway::observability::{logging, metrics};
use omni_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "omni-gateway")]
#[command(about = "JSON gateway for a hosted database REST API", long_about = None)]
struct Args {
    /// TOML configuration file. Environment variables override it.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding the config file.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load .env if present
    let _ = dotenvy::dotenv();

    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_level);
    tracing::info!("omni-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        service_key = config.upstream.service_key.is_some(),
        allow_public_write = config.write_policy.allow_public_write,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
