//! Prometheus metrics for monitoring platform activity.
//!
//! Metrics are exposed in Prometheus text format on a dedicated listener,
//! enabled by setting `METRICS_BIND`.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize the Prometheus metrics exporter.
///
/// Metrics become available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))
}

/// Record an HTTP request with method, path, and status labels.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment the submitted coin request counter.
pub fn coin_requests_submitted_total(request_type: &str) {
    metrics::counter!("coin_requests_submitted_total",
        "type" => request_type.to_string()
    )
    .increment(1);
}

/// Increment the resolved coin request counter.
pub fn coin_requests_resolved_total(outcome: &str) {
    metrics::counter!("coin_requests_resolved_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Increment the tournament join counter.
pub fn tournament_joins_total() {
    metrics::counter!("tournament_joins_total").increment(1);
}

/// Increment the daily spin counter.
pub fn daily_spins_total() {
    metrics::counter!("daily_spins_total").increment(1);
}
