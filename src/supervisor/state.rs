//! Front-end process state machine.
//!
//! ```text
//! NotStarted → Installing → Starting → Running
//!          └───────────────↗
//! ```
//!
//! No transition ever goes back; a crashed dev server stays `Running` as far
//! as this process knows until the API server restarts.

use tokio::sync::watch;

use crate::observability::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    NotStarted,
    Installing,
    Starting,
    Running { pid: Option<u32> },
}

impl SupervisorState {
    fn rank(&self) -> u8 {
        match self {
            SupervisorState::NotStarted => 0,
            SupervisorState::Installing => 1,
            SupervisorState::Starting => 2,
            SupervisorState::Running { .. } => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SupervisorState::NotStarted => "not_started",
            SupervisorState::Installing => "installing",
            SupervisorState::Starting => "starting",
            SupervisorState::Running { .. } => "running",
        }
    }
}

/// Write side of the state, owned by the supervisor task.
#[derive(Debug)]
pub struct StateCell {
    tx: watch::Sender<SupervisorState>,
}

impl StateCell {
    pub fn new() -> (Self, watch::Receiver<SupervisorState>) {
        let (tx, rx) = watch::channel(SupervisorState::NotStarted);
        (Self { tx }, rx)
    }

    /// Move forward to `next`. Returns false, leaving the state untouched,
    /// if `next` is not ahead of the current state.
    pub fn advance(&self, next: SupervisorState) -> bool {
        let moved = self.tx.send_if_modified(|current| {
            if next.rank() > current.rank() {
                *current = next;
                true
            } else {
                false
            }
        });
        if moved {
            metrics::record_frontend_state(f64::from(next.rank()));
            tracing::debug!(state = next.name(), "Front-end state changed");
        }
        moved
    }

    pub fn current(&self) -> SupervisorState {
        *self.tx.borrow()
    }
}
