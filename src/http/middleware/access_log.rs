//! Access log middleware.
//! One structured event per request, plus request metrics.

use std::time::Instant;

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::RequestIdExt;
use crate::http::response::ProviderFailure;
use crate::observability::metrics;

pub async fn access_log_middleware(request: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request.request_id().unwrap_or("unknown").to_string();

    let response = next.run(request).await;
    let status = response.status();
    let latency_ms = start_time.elapsed().as_millis() as u64;

    metrics::record_request(method.as_str(), status.as_u16(), start_time);

    if let Some(failure) = response.extensions().get::<ProviderFailure>() {
        tracing::error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            pool = %failure.pool,
            status = status.as_u16(),
            latency_ms,
            error = %failure.message,
            "Failed to serve pool config"
        );
    } else if status.is_success() {
        tracing::info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms,
            "Served pool config"
        );
    } else {
        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms,
            "Request rejected"
        );
    }

    response
}
