use std::sync::Arc;

use axum::extract::State;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder and describe the service metrics.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    metrics::describe_counter!(
        "card_requests_total",
        "Requests handled per endpoint, labelled by outcome"
    );
    metrics::describe_histogram!(
        "upstream_request_seconds",
        "Time spent waiting on the rendering service, image sources and the image host"
    );

    Ok(handle)
}

/// GET /metrics — Prometheus text exposition format.
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> String {
    handle.render()
}
