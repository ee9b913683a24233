//! API server bootstrap with a front-end development server bridge.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod supervisor;

pub use config::BridgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use supervisor::FrontendSupervisor;
