//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, status, route
//! - `router_request_duration_seconds` (histogram): latency distribution
//! - `router_resolve_failures_total` (counter): routing misses by kind
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels use route names, never raw paths, to bound cardinality

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("route", route.to_string()),
    ];
    counter!("router_requests_total", &labels).increment(1);
    histogram!("router_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

/// Record a request that did not resolve to a route.
pub fn record_resolve_failure(kind: &'static str) {
    counter!("router_resolve_failures_total", "kind" => kind).increment(1);
}
