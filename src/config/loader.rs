//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::BridgeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { name: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { name, value } => write!(f, "Invalid value for {}: {:?}", name, value),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<BridgeConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => BridgeConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `APP_*` overrides. `lookup` resolves a variable name to its value.
pub fn apply_env_overrides<F>(config: &mut BridgeConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("APP_PORT") {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::Env {
            name: "APP_PORT",
            value: port.clone(),
        })?;
        config.listener.bind_address = with_port(&config.listener.bind_address, port);
    }

    if let Some(credentials) = lookup("APP_BASIC_AUTH") {
        config.app.basic_auth = credentials
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(base_path) = lookup("APP_BASE_PATH") {
        config.app.base_path = base_path;
    }

    if let Some(debug) = lookup("APP_DEBUG") {
        config.app.debug = matches!(debug.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
    }

    Ok(())
}

/// Replace the port of a `host:port` bind address.
pub fn with_port(bind_address: &str, port: u16) -> String {
    let host = bind_address
        .rsplit_once(':')
        .map(|(host, _)| host)
        .unwrap_or("0.0.0.0");
    format!("{}:{}", host, port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = BridgeConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("APP_PORT", "8080"),
                ("APP_BASIC_AUTH", "admin:secret, ops:pw"),
                ("APP_BASE_PATH", "/gateway"),
                ("APP_DEBUG", "true"),
            ]),
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.app.basic_auth, vec!["admin:secret", "ops:pw"]);
        assert_eq!(config.app.base_path, "/gateway");
        assert!(config.app.debug);
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = BridgeConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("APP_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: "APP_PORT", .. }));
    }

    #[test]
    fn test_with_port_keeps_ipv6_host() {
        assert_eq!(with_port("[::1]:3000", 9000), "[::1]:9000");
        assert_eq!(with_port("127.0.0.1:3000", 9000), "127.0.0.1:9000");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [frontend]
            namespace = "/ui"
            dev_server_port = 5173
            "#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.frontend.namespace, "/ui");
        assert_eq!(config.frontend.dev_server_port, 5173);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[frontend]\nnamespace = \"web\"").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("frontend.namespace"));
    }
}
