//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the listener and pin the real port into the config
//! - Boot the front-end supervisor exactly once, without waiting on it
//! - Serve the API and the front-end bridge

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::BridgeConfig;
use crate::http::HttpServer;
use crate::supervisor::{self, BootOutcome, FrontendSupervisor, LaunchPlan};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Bind, boot the front-end and serve until `shutdown` fires.
pub async fn run(
    mut config: BridgeConfig,
    routes: Router,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr()?;
    config.listener.bind_address = local_addr.to_string();

    let supervisor = FrontendSupervisor::new(LaunchPlan::from_config(&config));
    match supervisor.boot() {
        BootOutcome::Launched(handle) => {
            supervisor::report(handle);
        }
        BootOutcome::ProjectMissing | BootOutcome::AlreadyBooted => {}
    }

    tracing::info!(
        web = %format!("http://localhost:{}{}", local_addr.port(), config.frontend.namespace),
        api = %format!("http://localhost:{}{}", local_addr.port(), config.app.base_path),
        "API server starting"
    );

    HttpServer::with_routes(config, routes)
        .run(listener, shutdown)
        .await?;
    Ok(())
}
