//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → classifier.rs (ordered rules)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: LocalApi(path) | ExternalDevServer(path) | NotApplicable
//!
//! Rule Compilation (at startup):
//!     FrontendConfig
//!     → Compile matchers in declaration order
//!     → Freeze as immutable RouteClassifier
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same rule
//! - First match wins

pub mod classifier;
pub mod matcher;

pub use classifier::{Disposition, RouteClassifier};
