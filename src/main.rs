//! frontend-bridge
//!
//! Serves the API route groups and bridges a front-end namespace to a
//! separately running development server.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                 API SERVER                   │
//!   Client Request        │  ┌────────────┐   ┌──────────────┐           │
//!   ──────────────────────┼─▶│ middleware │──▶│  classifier  │           │
//!                         │  │ cors/limit │   └──────┬───────┘           │
//!                         │  └────────────┘          │                   │
//!                         │          ┌───────────────┼──────────────┐    │
//!                         │          ▼               ▼              ▼    │
//!                         │   NotApplicable      LocalApi    ExternalDev │
//!                         │   route groups    loop-back call  forwarder ─┼──▶ dev server
//!                         │                                              │      ▲
//!                         │  ┌────────────────────────────────────────┐  │      │
//!                         │  │ supervisor: install → start (once)     │──┼──────┘
//!                         │  └────────────────────────────────────────┘  │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use axum::Router;
use clap::Parser;

use frontend_bridge::config::{self, loader::with_port, validation::validate_config, ConfigError};
use frontend_bridge::lifecycle::{startup, Shutdown};
use frontend_bridge::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "frontend-bridge")]
#[command(about = "API server with a front-end dev server bridge", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config and APP_PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Log every request.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.listener.bind_address = with_port(&config.listener.bind_address, port);
    }
    if cli.debug {
        config.app.debug = true;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config);
    tracing::info!("frontend-bridge v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        namespace = %config.frontend.namespace,
        dev_server_port = config.frontend.dev_server_port,
        project_dir = %config.frontend.project_dir,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    shutdown.on_ctrl_c();

    startup::run(config, Router::new(), shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
