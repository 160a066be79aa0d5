//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use machine_config_server::http::build_app;
use machine_config_server::{ConfigProvider, ConfigRouter, PoolRequest, ProviderError};
use serde_json::Value;
use tower::ServiceExt;

type Respond = dyn Fn(&PoolRequest) -> Result<Option<Value>, ProviderError> + Send + Sync;

/// Provider whose answer is a closure; records every pool it was asked for.
#[derive(Clone)]
pub struct ScriptedProvider {
    respond: Arc<Respond>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&PoolRequest) -> Result<Option<Value>, ProviderError> + Send + Sync + 'static,
    {
        Self {
            respond: Arc::new(respond),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfigProvider for ScriptedProvider {
    type Document = Value;

    async fn get_config(&self, request: &PoolRequest) -> Result<Option<Value>, ProviderError> {
        self.calls.lock().unwrap().push(request.pool().to_string());
        (self.respond)(request)
    }
}

/// Captured response.
#[allow(dead_code)]
pub struct Captured {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[allow(dead_code)]
impl Captured {
    /// `Content-Length` as sent, or 0 when the transport omitted it.
    pub fn content_length(&self) -> usize {
        self.headers
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").and_then(|v| v.to_str().ok())
    }
}

/// Run one request through the full layered app in-process.
pub async fn send<P: ConfigProvider>(provider: P, method: Method, uri: &str) -> Captured {
    let app = build_app(ConfigRouter::new(provider), Duration::from_secs(5));
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    Captured {
        status,
        headers,
        body,
    }
}
