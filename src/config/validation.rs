//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject malformed basic auth credentials (fatal at boot)
//! - Check path prefixes are usable for prefix matching
//! - Keep the dev server off the API server's own port
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::SocketAddr;

use axum::http::HeaderValue;

use crate::config::schema::BridgeConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let backend_port = match config.listener.bind_address.parse::<SocketAddr>() {
        Ok(addr) => Some(addr.port()),
        Err(e) => {
            errors.push(ValidationError::new("listener.bind_address", e.to_string()));
            None
        }
    };

    for (i, credential) in config.app.basic_auth.iter().enumerate() {
        let parts: Vec<&str> = credential.split(':').collect();
        if parts.len() != 2 || parts[0].is_empty() {
            errors.push(ValidationError::new(
                format!("app.basic_auth[{}]", i),
                "expected <user>:<secret>",
            ));
        }
    }

    if !config.app.base_path.is_empty()
        && (!config.app.base_path.starts_with('/') || config.app.base_path.ends_with('/'))
    {
        errors.push(ValidationError::new(
            "app.base_path",
            "must start with '/' and have no trailing '/'",
        ));
    }

    let frontend = &config.frontend;
    if !frontend.namespace.starts_with('/') || frontend.namespace.len() < 2 || frontend.namespace.ends_with('/') {
        errors.push(ValidationError::new(
            "frontend.namespace",
            "must start with '/', be non-root and have no trailing '/'",
        ));
    }
    if !frontend.api_prefix.starts_with('/') || frontend.api_prefix.len() < 2 {
        errors.push(ValidationError::new("frontend.api_prefix", "must start with '/' and be non-root"));
    }
    if !frontend.api_rewrite_prefix.is_empty() && !frontend.api_rewrite_prefix.starts_with('/') {
        errors.push(ValidationError::new("frontend.api_rewrite_prefix", "must be empty or start with '/'"));
    }
    for (i, prefix) in frontend.dev_tooling_prefixes.iter().enumerate() {
        if !prefix.starts_with('/') || prefix.trim_end_matches('/').len() < 2 {
            errors.push(ValidationError::new(
                format!("frontend.dev_tooling_prefixes[{}]", i),
                "must start with '/' and be non-root",
            ));
        }
    }
    for (i, ext) in frontend.static_extensions.iter().enumerate() {
        if ext.is_empty() || ext.contains('.') || ext.contains('/') {
            errors.push(ValidationError::new(
                format!("frontend.static_extensions[{}]", i),
                "must be a bare extension such as \"svg\"",
            ));
        }
    }

    if frontend.dev_server_port == 0 {
        errors.push(ValidationError::new("frontend.dev_server_port", "must be non-zero"));
    } else if backend_port == Some(frontend.dev_server_port)
        && frontend.dev_server_host == frontend.backend_host
    {
        errors.push(ValidationError::new(
            "frontend.dev_server_port",
            "must differ from the API server port",
        ));
    }

    if frontend.install_command.is_empty() {
        errors.push(ValidationError::new("frontend.install_command", "must not be empty"));
    }
    if frontend.start_command.is_empty() {
        errors.push(ValidationError::new("frontend.start_command", "must not be empty"));
    }

    for (i, origin) in config.cors.allowed_origins.iter().enumerate() {
        if HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::new(
                format!("cors.allowed_origins[{}]", i),
                "not a valid header value",
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
