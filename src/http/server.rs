//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router that feeds every request to the config router
//! - Wire up middleware (timeout, request ID, access log, tracing)
//! - Bind server to listener
//! - Drain in-flight requests on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{Method, Uri},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::middleware::access_log_middleware;
use crate::http::request::request_id_layer;
use crate::provider::ConfigProvider;
use crate::routing::ConfigRouter;

/// HTTP server for pool configuration documents.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving documents from `provider`.
    pub fn new<P: ConfigProvider>(config: ServerConfig, provider: Arc<P>) -> Self {
        let config_router = ConfigRouter::from_shared(provider);
        let router = build_app(
            config_router,
            Duration::from_secs(config.timeouts.request_secs),
        );
        Self { router, config }
    }

    /// The fully layered application, for in-process use.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_app<P: ConfigProvider>(router: ConfigRouter<P>, request_timeout: Duration) -> Router {
    Router::new()
        .fallback(config_handler::<P>)
        .with_state(router)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(access_log_middleware))
        .layer(request_id_layer())
        .layer(TraceLayer::new_for_http())
}

/// Every request lands here; the config router decides the outcome.
async fn config_handler<P: ConfigProvider>(
    State(router): State<ConfigRouter<P>>,
    method: Method,
    uri: Uri,
) -> Response {
    router.handle(&method, uri.path()).await.into_response()
}
