//! Request forwarding to the selected upstream.
//!
//! # Responsibilities
//! - Buffer the inbound body
//! - Build the outbound request: same method, headers and body bytes
//! - Send it to the backend or the dev server
//! - Hand the upstream response to the relay
//!
//! # Design Decisions
//! - Headers copied verbatim with all values; no X-Forwarded-* added
//! - `Host` comes from the upstream URI, as any client addressing it would set
//! - No retries and no deadline beyond the connector's connect timeout
//! - Dropping the inbound handler (caller disconnect) drops the outbound call

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, Response};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::error::ProxyError;
use crate::http::response::relay;
use crate::http::upstream::{UpstreamKind, Upstreams};

/// Forwards requests to the upstreams over a shared pooled client.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    upstreams: Upstreams,
}

impl Forwarder {
    pub fn new(upstreams: Upstreams, connect_timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self { client, upstreams }
    }

    pub fn upstreams(&self) -> &Upstreams {
        &self.upstreams
    }

    /// Forward `request` to `kind` under `path`, keeping the original query string.
    pub async fn forward(
        &self,
        kind: UpstreamKind,
        path: &str,
        request: Request<Body>,
    ) -> Result<Response<Body>, ProxyError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(ProxyError::from_body_error)?;

        let target = target_uri(self.upstreams.base_url(kind), path, parts.uri.query());

        let mut builder = Request::builder().method(parts.method).uri(target);
        if let Some(headers) = builder.headers_mut() {
            copy_headers(&parts.headers, headers);
        }
        let outbound = builder
            .body(Body::from(body))
            .map_err(ProxyError::Construction)?;

        let response = self
            .client
            .request(outbound)
            .await
            .map_err(|source| ProxyError::Unavailable { kind, source })?;

        Ok(relay(response).await)
    }
}

/// Join an upstream base URL, a path and an optional query string.
pub fn target_uri(base_url: &str, path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) => format!("{}{}?{}", base_url, path, query),
        None => format!("{}{}", base_url, path),
    }
}

/// Append every inbound header except `Host` onto the outbound map.
fn copy_headers(from: &HeaderMap, to: &mut HeaderMap) {
    for (name, value) in from.iter() {
        if *name == header::HOST {
            continue;
        }
        to.append(name.clone(), value.clone());
    }
}
