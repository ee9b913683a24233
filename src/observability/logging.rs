//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` overrides the configured level
//! - Per-request spans from tower-http only in debug mode

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::BridgeConfig;

/// Default filter directives derived from configuration.
pub fn default_directives(config: &BridgeConfig) -> String {
    let http_level = if config.app.debug { "debug" } else { "warn" };
    format!(
        "frontend_bridge={},tower_http={}",
        config.observability.log_level, http_level
    )
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init(config: &BridgeConfig) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives(config).into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
