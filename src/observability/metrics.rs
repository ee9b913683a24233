//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bridge_proxied_requests_total` (counter): proxied requests by method, status, upstream
//! - `bridge_proxied_request_duration_seconds` (histogram): latency per upstream
//! - `bridge_frontend_state` (gauge): supervisor state, 0=not started .. 3=running

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_proxy_request(method: &str, status: u16, upstream: &'static str, start: Instant) {
    counter!(
        "bridge_proxied_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "upstream" => upstream
    )
    .increment(1);
    histogram!("bridge_proxied_request_duration_seconds", "upstream" => upstream)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_frontend_state(value: f64) {
    gauge!("bridge_frontend_state").set(value);
}
