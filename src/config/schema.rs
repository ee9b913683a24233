//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Root configuration for the API server and its front-end bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// API server settings shared with the route groups.
    pub app: AppConfig,

    /// Front-end namespace, dev server and process settings.
    pub frontend: FrontendConfig,

    /// CORS policy applied to every route.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl BridgeConfig {
    /// Port the API server listens on, if the bind address parses.
    pub fn backend_port(&self) -> Option<u16> {
        self.listener
            .bind_address
            .parse::<SocketAddr>()
            .ok()
            .map(|addr| addr.port())
    }

    /// Base URL the API server can be reached at from this host.
    pub fn backend_base_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.frontend.backend_host,
            self.backend_port().unwrap_or_default()
        )
    }

    /// Base URL of the front-end development server.
    pub fn dev_server_base_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.frontend.dev_server_host, self.frontend.dev_server_port
        )
    }

    /// Credential string shared with the front-end process, if any is configured.
    pub fn shared_credential(&self) -> Option<String> {
        if self.app.basic_auth.is_empty() {
            None
        } else {
            Some(self.app.basic_auth.join(","))
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Maximum inbound request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            max_body_size: 100 * 1024 * 1024,
        }
    }
}

/// API server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path prefix the external route groups are mounted under.
    pub base_path: String,

    /// Basic auth credentials, each in `user:secret` form.
    pub basic_auth: Vec<String>,

    /// Verbose request logging.
    pub debug: bool,

    /// Directory served under `<base_path>/statics`.
    pub static_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            basic_auth: Vec::new(),
            debug: false,
            static_dir: Some("statics".to_string()),
        }
    }
}

/// Front-end namespace and dev server process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Front-end project directory, relative to the working directory.
    pub project_dir: String,

    /// Path prefix grouping all front-end traffic.
    pub namespace: String,

    /// API sub-prefix inside the namespace served by the local backend.
    pub api_prefix: String,

    /// Prefix put in front of the API remainder when calling the backend.
    pub api_rewrite_prefix: String,

    /// Host used for loop-back calls into the API server.
    pub backend_host: String,

    /// Host of the front-end development server.
    pub dev_server_host: String,

    /// Port of the front-end development server.
    pub dev_server_port: u16,

    /// Root-level hot-reload and dev-tooling prefixes, forwarded unchanged.
    /// A trailing `/` matches the directory itself as well as everything below it.
    pub dev_tooling_prefixes: Vec<String>,

    /// Root-level file extensions served from the front-end public directory.
    pub static_extensions: Vec<String>,

    /// Directory inside the project whose presence means dependencies are installed.
    pub install_marker: String,

    /// Dependency installation command (program followed by arguments).
    pub install_command: Vec<String>,

    /// Dev server start command (program followed by arguments).
    pub start_command: Vec<String>,

    /// Environment variable carrying the shared credential.
    pub credential_env: String,

    /// Front-end visible mirror of the shared credential.
    pub public_credential_env: String,

    /// Environment variable carrying the backend base URL.
    pub backend_url_env: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            project_dir: "whatsapp-web".to_string(),
            namespace: "/web".to_string(),
            api_prefix: "/api".to_string(),
            api_rewrite_prefix: "/api".to_string(),
            backend_host: "localhost".to_string(),
            dev_server_host: "localhost".to_string(),
            dev_server_port: 3001,
            dev_tooling_prefixes: vec!["/_next/".to_string(), "/__next".to_string()],
            static_extensions: vec!["svg".to_string(), "png".to_string(), "jpg".to_string()],
            install_marker: "node_modules".to_string(),
            install_command: vec!["npm".to_string(), "install".to_string()],
            start_command: vec!["npm".to_string(), "run".to_string(), "dev".to_string()],
            credential_env: "APP_BASIC_AUTH".to_string(),
            public_credential_env: "NEXT_PUBLIC_APP_BASIC_AUTH".to_string(),
            backend_url_env: "NEXT_PUBLIC_WHATSAPP_API_URL".to_string(),
        }
    }
}

/// CORS policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: [
                "http://localhost:3000",
                "http://localhost:3001",
                "http://127.0.0.1:3000",
                "http://127.0.0.1:3001",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allowed_headers: ["Origin", "Content-Type", "Accept", "Authorization"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allow_credentials: true,
        }
    }
}

/// Timeout configuration for outbound calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { connect_secs: 30 }
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
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: BridgeConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:4000"

            [frontend]
            dev_server_port = 5173
            "#,
        )
        .unwrap();

        assert_eq!(config.backend_port(), Some(4000));
        assert_eq!(config.frontend.namespace, "/web");
        assert_eq!(config.dev_server_base_url(), "http://localhost:5173");
        assert_eq!(config.backend_base_url(), "http://localhost:4000");
    }

    #[test]
    fn test_frontend_defaults_match_whatsapp_web_project() {
        let frontend = FrontendConfig::default();
        assert_eq!(frontend.project_dir, "whatsapp-web");
        assert_eq!(frontend.backend_url_env, "NEXT_PUBLIC_WHATSAPP_API_URL");
        assert_eq!(frontend.credential_env, "APP_BASIC_AUTH");
        assert_eq!(frontend.public_credential_env, "NEXT_PUBLIC_APP_BASIC_AUTH");
    }

    #[test]
    fn test_shared_credential_joins_entries() {
        let mut config = BridgeConfig::default();
        assert_eq!(config.shared_credential(), None);

        config.app.basic_auth = vec!["admin:secret".into(), "ops:pw".into()];
        assert_eq!(config.shared_credential().as_deref(), Some("admin:secret,ops:pw"));
    }
}
