//! Front-end dev server supervision.
//!
//! # Data Flow
//! ```text
//! boot (once, from startup)
//!     → project directory missing? log and return ProjectMissing
//!     → spawn supervisor task:
//!         install marker missing? → Installing → run install command
//!         → Starting → spawn dev server (detached)
//!         → Running { pid }
//!     → SupervisorHandle (state watch + outcome)
//!     → report() logs the outcome
//! ```
//!
//! # Design Decisions
//! - The one-time guard lives in the supervisor value, not in a global
//! - Server boot never waits on install or start
//! - No readiness probe and no restart on crash

pub mod process;
pub mod state;

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use process::LaunchPlan;
pub use state::SupervisorState;

use state::StateCell;

/// Errors that abort the start sequence for this boot.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("{0} command is empty")]
    EmptyCommand(&'static str),

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}")]
    InstallFailed {
        command: String,
        status: std::process::ExitStatus,
    },

    #[error("supervisor task ended abnormally: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result of a boot attempt.
#[derive(Debug)]
pub enum BootOutcome {
    /// No front-end project on disk; nothing was started.
    ProjectMissing,
    /// `boot` already ran for this supervisor.
    AlreadyBooted,
    /// The install/start sequence is running in the background.
    Launched(SupervisorHandle),
}

/// Observes a launched supervisor task.
#[derive(Debug)]
pub struct SupervisorHandle {
    state: watch::Receiver<SupervisorState>,
    task: JoinHandle<Result<Option<u32>, SupervisorError>>,
}

impl SupervisorHandle {
    pub fn state(&self) -> SupervisorState {
        *self.state.borrow()
    }

    /// A receiver that keeps observing the state after `outcome` consumes the handle.
    pub fn state_watch(&self) -> watch::Receiver<SupervisorState> {
        self.state.clone()
    }

    /// Wait for the start sequence to finish. Yields the dev server pid.
    pub async fn outcome(self) -> Result<Option<u32>, SupervisorError> {
        self.task.await?
    }
}

pub struct FrontendSupervisor {
    plan: LaunchPlan,
    booted: AtomicBool,
}

impl FrontendSupervisor {
    pub fn new(plan: LaunchPlan) -> Self {
        Self {
            plan,
            booted: AtomicBool::new(false),
        }
    }

    pub fn plan(&self) -> &LaunchPlan {
        &self.plan
    }

    /// Start the dev server in the background, at most once per supervisor.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn boot(&self) -> BootOutcome {
        if self.booted.swap(true, Ordering::SeqCst) {
            tracing::debug!("Front-end supervisor already booted");
            return BootOutcome::AlreadyBooted;
        }

        if !self.plan.project_exists() {
            tracing::warn!(
                project_dir = %self.plan.project_dir.display(),
                "Front-end project directory not found, skipping dev server"
            );
            return BootOutcome::ProjectMissing;
        }

        let (cell, state) = StateCell::new();
        let plan = self.plan.clone();
        let task = tokio::spawn(async move { start_sequence(plan, cell).await });

        BootOutcome::Launched(SupervisorHandle { state, task })
    }
}

async fn start_sequence(plan: LaunchPlan, state: StateCell) -> Result<Option<u32>, SupervisorError> {
    if plan.needs_install() {
        state.advance(SupervisorState::Installing);
        tracing::info!(
            project_dir = %plan.project_dir.display(),
            command = %plan.install_command.join(" "),
            "Installing front-end dependencies"
        );
        process::run_install(&plan).await?;
    }

    state.advance(SupervisorState::Starting);
    tracing::info!(command = %plan.start_command.join(" "), "Starting front-end dev server");

    // Dropping the handle leaves the child running; the runtime reaps it.
    let child = process::spawn_dev_server(&plan)?;
    let pid = child.id();
    state.advance(SupervisorState::Running { pid });

    tracing::info!(
        pid = ?pid,
        url = %plan.dev_server_url,
        "Front-end dev server started"
    );
    Ok(pid)
}

/// Log the outcome of a launched supervisor once it completes.
pub fn report(handle: SupervisorHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        match handle.outcome().await {
            Ok(pid) => tracing::debug!(pid = ?pid, "Front-end supervisor finished"),
            Err(e) => tracing::error!(error = %e, "Failed to start front-end dev server"),
        }
    })
}
