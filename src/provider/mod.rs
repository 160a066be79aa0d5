//! Configuration providers.
//!
//! # Data Flow
//! ```text
//! HTTP request for /config/<pool>
//!     → routing (PoolRequest extracted from the path)
//!     → ConfigProvider::get_config(&PoolRequest)
//!     → Ok(Some(doc))  document for a known pool
//!       Ok(None)       pool unknown
//!       Err(e)         pool known but the document could not be produced
//! ```
//!
//! # Design Decisions
//! - The router only sees the trait; any backing store is substitutable
//! - Providers own their concurrency safety (`Send + Sync`, shared via Arc)
//! - Absence and failure are separate channels so 404 and 500 stay distinct

pub mod directory;
pub mod memory;
pub mod watcher;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use directory::DirectoryProvider;
pub use memory::StaticProvider;
pub use watcher::PoolWatcher;

/// A request for the configuration document of one machine pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolRequest {
    pool: String,
}

impl PoolRequest {
    /// Build a request for `pool`. The name is kept exactly as given.
    pub fn new(pool: impl Into<String>) -> Self {
        Self { pool: pool.into() }
    }

    /// The pool identifier, verbatim from the request path.
    pub fn pool(&self) -> &str {
        &self.pool
    }
}

/// Errors a provider can report for a pool it knows about.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The document for the pool exists but could not be read.
    #[error("failed to read document for pool {pool}: {reason}")]
    Read { pool: String, reason: String },

    /// The document for the pool exists but is not valid JSON.
    #[error("invalid document for pool {pool}: {reason}")]
    Invalid { pool: String, reason: String },

    /// The provider cannot serve any request right now.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Source of per-pool configuration documents.
///
/// `Ok(None)` means the pool is unknown. Any error means the pool could not be
/// served; a provider that has a partial document alongside an error reports
/// only the error.
#[async_trait]
pub trait ConfigProvider: Send + Sync + 'static {
    /// Document type served to clients. Treated as opaque and only serialized.
    type Document: Serialize + Send;

    async fn get_config(
        &self,
        request: &PoolRequest,
    ) -> Result<Option<Self::Document>, ProviderError>;
}
