//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, front-end interception)
//!     → [routing classifier picks upstream or falls through]
//!     → request.rs (build and send the outbound request)
//!     → response.rs (relay status, headers, body)
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;
pub mod upstream;

pub use error::ProxyError;
pub use request::Forwarder;
pub use server::HttpServer;
pub use upstream::{UpstreamKind, Upstreams};
