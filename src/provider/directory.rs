//! Provider serving `<pool>.json` documents from a directory.
//!
//! # Responsibilities
//! - Scan the directory into an immutable snapshot
//! - Record unreadable or malformed files as per-pool failures
//! - Swap in a fresh snapshot on reload without blocking readers
//!
//! # Design Decisions
//! - Reads happen at load/reload time only; requests never touch the disk
//! - A broken file makes its pool fail (500) instead of disappearing (404)
//! - A failed reload keeps the previous snapshot

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::{ConfigProvider, PoolRequest, ProviderError};
use crate::observability::metrics;

const DOCUMENT_EXTENSION: &str = "json";

/// Error raised when the pool directory itself cannot be scanned.
#[derive(Debug, Error)]
#[error("failed to read pool directory {}: {source}", .path.display())]
pub struct DirectoryError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// One consistent view of the directory.
#[derive(Debug, Default)]
struct Snapshot {
    documents: HashMap<String, Value>,
    failures: HashMap<String, ProviderError>,
}

struct Inner {
    directory: PathBuf,
    snapshot: ArcSwap<Snapshot>,
}

/// Directory-backed provider. Clones share the same snapshot.
#[derive(Clone)]
pub struct DirectoryProvider {
    inner: Arc<Inner>,
}

impl DirectoryProvider {
    /// Scan `directory` and build the initial snapshot.
    pub fn load(directory: impl Into<PathBuf>) -> Result<Self, DirectoryError> {
        let directory = directory.into();
        let snapshot = scan(&directory)?;

        tracing::info!(
            directory = %directory.display(),
            documents = snapshot.documents.len(),
            failures = snapshot.failures.len(),
            "Pool documents loaded"
        );
        metrics::set_provider_documents(snapshot.documents.len());

        Ok(Self {
            inner: Arc::new(Inner {
                directory,
                snapshot: ArcSwap::from_pointee(snapshot),
            }),
        })
    }

    /// Rescan the directory and publish the result.
    ///
    /// Returns the number of servable documents. On error the current
    /// snapshot stays in place.
    pub fn reload(&self) -> Result<usize, DirectoryError> {
        match scan(&self.inner.directory) {
            Ok(snapshot) => {
                let count = snapshot.documents.len();
                for (pool, err) in &snapshot.failures {
                    tracing::warn!(pool = %pool, error = %err, "Pool document unusable");
                }
                self.inner.snapshot.store(Arc::new(snapshot));
                metrics::record_provider_reload(true);
                metrics::set_provider_documents(count);
                Ok(count)
            }
            Err(e) => {
                metrics::record_provider_reload(false);
                Err(e)
            }
        }
    }

    /// Directory this provider reads from.
    pub fn directory(&self) -> &Path {
        &self.inner.directory
    }

    /// Pools that currently resolve to a document, sorted.
    pub fn pools(&self) -> Vec<String> {
        let snapshot = self.inner.snapshot.load();
        let mut pools: Vec<String> = snapshot.documents.keys().cloned().collect();
        pools.sort();
        pools
    }
}

impl std::fmt::Debug for DirectoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryProvider")
            .field("directory", &self.inner.directory)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ConfigProvider for DirectoryProvider {
    type Document = Value;

    async fn get_config(&self, request: &PoolRequest) -> Result<Option<Value>, ProviderError> {
        let snapshot = self.inner.snapshot.load();
        if let Some(err) = snapshot.failures.get(request.pool()) {
            return Err(err.clone());
        }
        Ok(snapshot.documents.get(request.pool()).cloned())
    }
}

/// Pool names come from file stems; hidden files never define a pool.
fn pool_name(path: &Path) -> Option<&str> {
    if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() || stem.starts_with('.') {
        return None;
    }
    Some(stem)
}

fn scan(directory: &Path) -> Result<Snapshot, DirectoryError> {
    let entries = fs::read_dir(directory).map_err(|source| DirectoryError {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut snapshot = Snapshot::default();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(directory = %directory.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let Some(pool) = pool_name(&path) else {
            continue;
        };
        let pool = pool.to_string();

        match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(doc) => {
                    snapshot.documents.insert(pool, doc);
                }
                Err(e) => {
                    let reason = e.to_string();
                    snapshot.failures.insert(pool.clone(), ProviderError::Invalid { pool, reason });
                }
            },
            Err(e) => {
                let reason = e.to_string();
                snapshot.failures.insert(pool.clone(), ProviderError::Read { pool, reason });
            }
        }
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[tokio::test]
    async fn test_serves_json_documents_by_stem() {
        let dir = TempDir::new().unwrap();
        write(&dir, "master.json", r#"{"ignition":{"version":"3.2.0"}}"#);
        write(&dir, "worker.json", "{}");
        write(&dir, "notes.txt", "not a pool");
        write(&dir, ".hidden.json", "{}");

        let provider = DirectoryProvider::load(dir.path()).unwrap();
        assert_eq!(provider.pools(), vec!["master".to_string(), "worker".to_string()]);

        let doc = provider.get_config(&PoolRequest::new("master")).await.unwrap();
        assert_eq!(doc, Some(json!({"ignition": {"version": "3.2.0"}})));

        let none = provider.get_config(&PoolRequest::new("notes")).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_malformed_document_is_a_failure_not_absence() {
        let dir = TempDir::new().unwrap();
        write(&dir, "infra.json", "{ not json");

        let provider = DirectoryProvider::load(dir.path()).unwrap();
        let err = provider.get_config(&PoolRequest::new("infra")).await.unwrap_err();
        assert!(matches!(err, ProviderError::Invalid { ref pool, .. } if pool == "infra"));
    }

    #[tokio::test]
    async fn test_path_like_pool_names_never_match() {
        let dir = TempDir::new().unwrap();
        write(&dir, "master.json", "{}");

        let provider = DirectoryProvider::load(dir.path()).unwrap();
        for pool in ["../master", "master.json", ".master", ""] {
            let res = provider.get_config(&PoolRequest::new(pool)).await.unwrap();
            assert!(res.is_none(), "pool {pool:?} should not resolve");
        }
    }

    #[tokio::test]
    async fn test_reload_publishes_new_snapshot() {
        let dir = TempDir::new().unwrap();
        write(&dir, "master.json", "{}");
        let provider = DirectoryProvider::load(dir.path()).unwrap();

        write(&dir, "worker.json", r#"{"role":"worker"}"#);
        fs::remove_file(dir.path().join("master.json")).unwrap();
        assert_eq!(provider.reload().unwrap(), 1);

        assert!(provider.get_config(&PoolRequest::new("master")).await.unwrap().is_none());
        let doc = provider.get_config(&PoolRequest::new("worker")).await.unwrap();
        assert_eq!(doc, Some(json!({"role": "worker"})));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let pools = dir.path().join("pools");
        fs::create_dir(&pools).unwrap();
        fs::write(pools.join("master.json"), "{}").unwrap();

        let provider = DirectoryProvider::load(&pools).unwrap();
        fs::remove_dir_all(&pools).unwrap();

        assert!(provider.reload().is_err());
        let doc = provider.get_config(&PoolRequest::new("master")).await.unwrap();
        assert_eq!(doc, Some(json!({})));
    }

    #[test]
    fn test_missing_directory_fails_load() {
        let dir = TempDir::new().unwrap();
        let err = DirectoryProvider::load(dir.path().join("absent")).unwrap_err();
        assert!(err.to_string().contains("failed to read pool directory"));
    }
}
