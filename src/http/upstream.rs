//! Upstream targets of the front-end bridge.

use std::fmt;

/// Which upstream a request is forwarded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    /// The API server itself, reached over loop-back.
    Backend,
    /// The external front-end development server.
    DevServer,
}

impl UpstreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamKind::Backend => "backend",
            UpstreamKind::DevServer => "dev_server",
        }
    }

    pub fn unavailable_message(&self) -> &'static str {
        match self {
            UpstreamKind::Backend => "Backend server unavailable",
            UpstreamKind::DevServer => "Front-end dev server unavailable",
        }
    }
}

impl fmt::Display for UpstreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved base URLs for both upstreams, fixed at boot.
#[derive(Debug, Clone)]
pub struct Upstreams {
    pub backend: String,
    pub dev_server: String,
}

impl Upstreams {
    pub fn new(backend: impl Into<String>, dev_server: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            dev_server: dev_server.into(),
        }
    }

    pub fn base_url(&self, kind: UpstreamKind) -> &str {
        match kind {
            UpstreamKind::Backend => &self.backend,
            UpstreamKind::DevServer => &self.dev_server,
        }
    }
}
