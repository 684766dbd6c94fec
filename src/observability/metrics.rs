//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_decisions_total` (counter): interceptor outcomes by `outcome`
//! - `edge_requests_total` (counter): emulator responses by method, status
//! - `edge_request_duration_seconds` (histogram): end-to-end latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics::Label;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one interceptor decision.
pub fn record_decision(outcome: &'static str) {
    metrics::counter!("edge_decisions_total", "outcome" => outcome).increment(1);
}

/// Count one emulator response and its latency.
pub fn record_request(method: &str, status: u16, outcome: &'static str, start: Instant) {
    let labels = vec![
        Label::new("method", method.to_string()),
        Label::new("status", status.to_string()),
        Label::new("outcome", outcome),
    ];
    metrics::counter!("edge_requests_total", labels.clone()).increment(1);
    metrics::histogram!("edge_request_duration_seconds", labels)
        .record(start.elapsed().as_secs_f64());
}
