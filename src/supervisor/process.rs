//! Child process plumbing for the front-end dev server.
//!
//! # Responsibilities
//! - Resolve project directory, install marker and commands from config
//! - Build the environment handed to the dev server
//! - Run the dependency install step
//! - Spawn the dev server, inheriting stdout/stderr

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::config::{BridgeConfig, FrontendConfig};
use crate::supervisor::SupervisorError;

/// Everything needed to install and start the dev server, captured at boot.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub project_dir: PathBuf,
    pub install_marker: PathBuf,
    pub install_command: Vec<String>,
    pub start_command: Vec<String>,
    pub env: Vec<(String, String)>,
    pub dev_server_url: String,
}

impl LaunchPlan {
    pub fn from_config(config: &BridgeConfig) -> Self {
        let frontend = &config.frontend;
        let project_dir = PathBuf::from(&frontend.project_dir);

        Self {
            install_marker: project_dir.join(&frontend.install_marker),
            project_dir,
            install_command: frontend.install_command.clone(),
            start_command: frontend.start_command.clone(),
            env: frontend_env(
                frontend,
                config.shared_credential().as_deref(),
                &config.backend_base_url(),
            ),
            dev_server_url: config.dev_server_base_url(),
        }
    }

    pub fn project_exists(&self) -> bool {
        self.project_dir.is_dir()
    }

    pub fn needs_install(&self) -> bool {
        !self.install_marker.is_dir()
    }
}

/// Variables added on top of the inherited environment.
pub fn frontend_env(
    frontend: &FrontendConfig,
    credential: Option<&str>,
    backend_url: &str,
) -> Vec<(String, String)> {
    let mut env = Vec::with_capacity(3);
    if let Some(credential) = credential.filter(|c| !c.is_empty()) {
        env.push((frontend.credential_env.clone(), credential.to_string()));
        env.push((frontend.public_credential_env.clone(), credential.to_string()));
    }
    env.push((frontend.backend_url_env.clone(), backend_url.to_string()));
    env
}

fn command(argv: &[String], dir: &Path, which: &'static str) -> Result<Command, SupervisorError> {
    let (program, args) = argv.split_first().ok_or(SupervisorError::EmptyCommand(which))?;
    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    Ok(cmd)
}

/// Run the install command to completion.
pub async fn run_install(plan: &LaunchPlan) -> Result<(), SupervisorError> {
    let display = plan.install_command.join(" ");
    let status = command(&plan.install_command, &plan.project_dir, "install")?
        .status()
        .await
        .map_err(|source| SupervisorError::Spawn {
            command: display.clone(),
            source,
        })?;

    if !status.success() {
        return Err(SupervisorError::InstallFailed {
            command: display,
            status,
        });
    }
    Ok(())
}

/// Spawn the dev server without waiting for it.
pub fn spawn_dev_server(plan: &LaunchPlan) -> Result<Child, SupervisorError> {
    let mut cmd = command(&plan.start_command, &plan.project_dir, "start")?;
    cmd.envs(plan.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    cmd.spawn().map_err(|source| SupervisorError::Spawn {
        command: plan.start_command.join(" "),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_with_credential() {
        let frontend = FrontendConfig::default();
        let env = frontend_env(&frontend, Some("admin:secret"), "http://localhost:3000");

        assert_eq!(
            env,
            vec![
                ("APP_BASIC_AUTH".to_string(), "admin:secret".to_string()),
                ("NEXT_PUBLIC_APP_BASIC_AUTH".to_string(), "admin:secret".to_string()),
                ("NEXT_PUBLIC_WHATSAPP_API_URL".to_string(), "http://localhost:3000".to_string()),
            ]
        );
    }

    #[test]
    fn test_env_without_credential() {
        let frontend = FrontendConfig::default();
        assert_eq!(frontend_env(&frontend, None, "http://localhost:3000").len(), 1);
        assert_eq!(frontend_env(&frontend, Some(""), "http://localhost:3000").len(), 1);
    }

    #[test]
    fn test_plan_from_config() {
        let mut config = BridgeConfig::default();
        config.listener.bind_address = "0.0.0.0:4000".into();
        config.frontend.project_dir = "ui".into();
        config.app.basic_auth = vec!["a:b".into()];

        let plan = LaunchPlan::from_config(&config);
        assert_eq!(plan.install_marker, PathBuf::from("ui").join("node_modules"));
        assert_eq!(plan.dev_server_url, "http://localhost:3001");
        assert!(plan
            .env
            .contains(&("NEXT_PUBLIC_WHATSAPP_API_URL".to_string(), "http://localhost:4000".to_string())));
        assert!(plan.env.contains(&("APP_BASIC_AUTH".to_string(), "a:b".to_string())));
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = command(&[], Path::new("."), "start").unwrap_err();
        assert!(matches!(err, SupervisorError::EmptyCommand("start")));
    }
}
