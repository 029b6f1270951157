//! Metrics collection and exposition.
//!
//! # Metrics
//! - `portal_navigations_total` (counter): navigations by outcome
//! - `portal_proxy_requests_total` (counter): forwarded requests by prefix, status
//! - `portal_proxy_request_duration_seconds` (histogram): upstream latency by prefix

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_navigation(outcome: &'static str) {
    counter!("portal_navigations_total", "outcome" => outcome).increment(1);
}

pub fn record_proxy(prefix: &str, status: u16, start: Instant) {
    counter!(
        "portal_proxy_requests_total",
        "prefix" => prefix.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("portal_proxy_request_duration_seconds", "prefix" => prefix.to_string())
        .record(start.elapsed().as_secs_f64());
}
