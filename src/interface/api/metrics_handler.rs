//! Prometheus metrics handler

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(
        "action_requests_total",
        "Total number of actions dispatched, by action and status"
    );
    describe_counter!(
        "ring_requests_total",
        "Total number of ring requests handled, by outcome"
    );
    describe_counter!(
        "ring_cancellations_total",
        "Total number of ring calls cancelled after the ring duration"
    );
    describe_counter!(
        "ring_cancellation_failures_total",
        "Total number of ring calls the transport failed to cancel"
    );
    describe_gauge!(
        "ring_pending_cancellations",
        "Number of ring calls waiting for their cancellation"
    );

    Ok(handle)
}

/// HTTP metrics handler
pub async fn metrics_handler(State(prometheus_handle): State<PrometheusHandle>) -> Response {
    let metrics = prometheus_handle.render();
    (StatusCode::OK, metrics).into_response()
}
