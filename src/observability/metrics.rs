//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by destination, status
//! - `gateway_request_duration_seconds` (histogram): time to response head, by destination
//! - `gateway_upstream_errors_total` (counter): forwarding failures by destination, kind
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(destination: &'static str, status: u16, start_time: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "destination" => destination,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "destination" => destination
    )
    .record(start_time.elapsed().as_secs_f64());
}

pub fn record_upstream_error(destination: &'static str, kind: &'static str) {
    metrics::counter!(
        "gateway_upstream_errors_total",
        "destination" => destination,
        "kind" => kind
    )
    .increment(1);
}
