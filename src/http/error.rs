//! Errors surfaced at the proxy's HTTP response boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;

use crate::http::upstream::UpstreamKind;

/// A failure while proxying a single request. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The inbound request body could not be read.
    #[error("failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),

    /// The inbound body outgrew the listener's body limit while streaming.
    #[error("request body exceeds the configured limit")]
    BodyTooLarge,

    /// The outbound request could not be built (bad method or URI).
    #[error("failed to build outbound request: {0}")]
    Construction(#[source] axum::http::Error),

    /// The selected upstream could not be reached.
    #[error("{kind} unreachable: {source}")]
    Unavailable {
        kind: UpstreamKind,
        #[source]
        source: hyper_util::client::legacy::Error,
    },
}

impl ProxyError {
    /// Classify a failed inbound body read.
    pub fn from_body_error(err: axum::Error) -> Self {
        if is_length_limit(&err) {
            ProxyError::BodyTooLarge
        } else {
            ProxyError::RequestBody(err)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::RequestBody(_) => StatusCode::BAD_REQUEST,
            ProxyError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::Construction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Unavailable { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Fixed plain-text diagnostic sent to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            ProxyError::RequestBody(_) => "Failed to read request body",
            ProxyError::BodyTooLarge => "Request body too large",
            ProxyError::Construction(_) => "Failed to create proxy request",
            ProxyError::Unavailable { kind, .. } => kind.unavailable_message(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}

fn is_length_limit(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}
