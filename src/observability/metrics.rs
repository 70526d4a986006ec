//! Metrics collection and exposition.
//!
//! # Metrics
//! - `marquee_requests_total` (counter): requests by method, status, route
//! - `marquee_request_duration_seconds` (histogram): latency distribution
//! - `marquee_middleware_halts_total` (counter): short-circuits by middleware
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs the Prometheus recorder
//! - Unmatched requests are labelled `route="none"` to bound cardinality

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("route", route.to_string()),
    ];
    metrics::counter!("marquee_requests_total", &labels).increment(1);
    metrics::histogram!("marquee_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

/// Record a middleware halting dispatch.
pub fn record_middleware_halt(middleware: &str) {
    metrics::counter!("marquee_middleware_halts_total", "middleware" => middleware.to_string()).increment(1);
}
