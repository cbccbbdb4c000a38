//! Prometheus metrics handler
//!
//! `GET /metrics` renders the global `metrics-exporter-prometheus` recorder
//! in Prometheus text format.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Shared state for the metrics endpoint
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// Register help text for every metric the service emits
pub fn describe_metrics() {
    metrics::describe_counter!(
        "reservations_created_total",
        "Tables successfully reserved"
    );
    metrics::describe_counter!(
        "reservation_conflicts_total",
        "Bookings rejected because the table was already reserved for the slot"
    );
    metrics::describe_counter!("http_requests_total", "HTTP requests by method, path and status");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        metrics::Unit::Seconds,
        "HTTP request latency"
    );
}

/// `GET /metrics`
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
