//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tx_submissions_total` (counter): broadcast attempts by outcome
//! - `tx_tracking_outcomes_total` (counter): terminal tracking states
//! - `node_rpc_failures_total` (counter): exhausted RPC calls by method

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape endpoint.
///
/// Must run inside a Tokio runtime. Failure is logged, not fatal; the
/// engine works without metrics exposition.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "failed to install metrics exporter"),
    }
}

/// Record a broadcast attempt ("accepted", "rejected").
pub fn record_submission(outcome: &'static str) {
    counter!("tx_submissions_total", "outcome" => outcome).increment(1);
}

/// Record a terminal tracking state ("confirmed", "failed", "dropped").
pub fn record_tracking_outcome(outcome: &'static str) {
    counter!("tx_tracking_outcomes_total", "outcome" => outcome).increment(1);
}

/// Record an RPC call that failed across all providers.
pub fn record_rpc_failure(method: &'static str) {
    counter!("node_rpc_failures_total", "method" => method).increment(1);
}
