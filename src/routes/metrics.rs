//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "mcp_chat_requests_total",
        "Total number of chat requests processed"
    );
    metrics::describe_histogram!(
        "mcp_chat_request_duration_seconds",
        "Chat request duration in seconds"
    );
    metrics::describe_counter!(
        "mcp_chat_upstream_failures_total",
        "Upstream completion calls that failed"
    );
    metrics::describe_gauge!(
        "mcp_chat_active_sessions",
        "Number of sessions held in memory"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a chat request
pub fn record_request(status: &str, model: &str, duration_secs: f64) {
    metrics::counter!("mcp_chat_requests_total", "status" => status.to_string(), "model" => model.to_string())
        .increment(1);
    metrics::histogram!("mcp_chat_request_duration_seconds", "model" => model.to_string())
        .record(duration_secs);
}

/// Record a failed upstream call
pub fn record_upstream_failure(provider: &str, kind: &str) {
    metrics::counter!(
        "mcp_chat_upstream_failures_total",
        "provider" => provider.to_string(),
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Update the active sessions gauge
pub fn set_active_sessions(count: usize) {
    metrics::gauge!("mcp_chat_active_sessions").set(count as f64);
}
