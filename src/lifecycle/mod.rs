//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Bind listener → Boot front-end supervisor (once) → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - The listener is bound before the supervisor boots so the dev server
//!   is told the port actually in use
//! - The dev server is not stopped on shutdown; it belongs to the OS once spawned

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
