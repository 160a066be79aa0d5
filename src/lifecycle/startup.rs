//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Start background tasks (pool watcher, metrics)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Pool documents are loaded before the listener binds
//! - Listener starts last (traffic only when ready)

use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics::{self, MetricsError};
use crate::provider::directory::DirectoryError;
use crate::provider::{DirectoryProvider, PoolWatcher};

/// Errors that abort startup or end the server.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid address {addr:?}: {reason}")]
    Address { addr: String, reason: String },

    #[error(transparent)]
    Provider(#[from] DirectoryError),

    #[error("failed to watch pool directory: {0}")]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bring the server up and run it until a termination signal arrives.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    serve(config, shutdown).await
}

/// Bring the server up and run it until `shutdown` is triggered.
pub async fn serve(config: ServerConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    let server_shutdown = shutdown.subscribe();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        directory = %config.provider.directory.display(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|e: AddrParseError| StartupError::Address {
                addr: config.observability.metrics_address.clone(),
                reason: e.to_string(),
            })?;
        metrics::init_metrics(addr).await?;
    }

    let provider = DirectoryProvider::load(&config.provider.directory)?;

    // Dropping the handle stops watching, so it lives until shutdown.
    let _watcher = if config.provider.watch {
        let interval = Duration::from_secs(config.provider.poll_interval_secs);
        Some(PoolWatcher::new(provider.clone(), interval).start()?)
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        pools = ?provider.pools(),
        "Listening for connections"
    );

    let server = HttpServer::new(config, Arc::new(provider));
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
