//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mcs_requests_total` (counter): requests by method, status
//! - `mcs_request_duration_seconds` (histogram): latency by method
//! - `mcs_provider_documents` (gauge): documents in the current snapshot
//! - `mcs_provider_reloads_total` (counter): directory reloads by result
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to bind metrics listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install metrics recorder: {0}")]
    Install(String),
}

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
pub async fn init_metrics(addr: SocketAddr) -> Result<(), MetricsError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| MetricsError::Bind { addr, source })?;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    let app = Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    );

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Metrics server error");
        }
    });

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start_time: Instant) {
    let method = method.to_string();
    metrics::counter!(
        "mcs_requests_total",
        "method" => method.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("mcs_request_duration_seconds", "method" => method)
        .record(start_time.elapsed().as_secs_f64());
}

pub fn set_provider_documents(count: usize) {
    metrics::gauge!("mcs_provider_documents").set(count as f64);
}

pub fn record_provider_reload(ok: bool) {
    let result = if ok { "success" } else { "failure" };
    metrics::counter!("mcs_provider_reloads_total", "result" => result).increment(1);
}
