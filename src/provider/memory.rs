//! In-memory provider backed by a fixed pool map.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use super::{ConfigProvider, PoolRequest, ProviderError};

/// Serves documents from a map built up front.
///
/// Pools registered with [`StaticProvider::with_failure`] always fail, which
/// lets callers model a pool that is known but cannot be rendered.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    documents: HashMap<String, Value>,
    failures: HashMap<String, String>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the document served for `pool`.
    pub fn with_document(mut self, pool: impl Into<String>, document: Value) -> Self {
        let pool = pool.into();
        self.failures.remove(&pool);
        self.documents.insert(pool, document);
        self
    }

    /// Make every request for `pool` fail with `reason`.
    pub fn with_failure(mut self, pool: impl Into<String>, reason: impl Into<String>) -> Self {
        let pool = pool.into();
        self.documents.remove(&pool);
        self.failures.insert(pool, reason.into());
        self
    }

    /// Number of pools that resolve to a document.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl ConfigProvider for StaticProvider {
    type Document = Value;

    async fn get_config(&self, request: &PoolRequest) -> Result<Option<Value>, ProviderError> {
        if let Some(reason) = self.failures.get(request.pool()) {
            return Err(ProviderError::Unavailable(reason.clone()));
        }
        Ok(self.documents.get(request.pool()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_known_unknown_and_failing_pools() {
        let provider = StaticProvider::new()
            .with_document("master", json!({"ignition": {"version": "3.2.0"}}))
            .with_failure("broken", "render failed");

        let doc = provider.get_config(&PoolRequest::new("master")).await.unwrap();
        assert_eq!(doc, Some(json!({"ignition": {"version": "3.2.0"}})));

        let missing = provider.get_config(&PoolRequest::new("worker")).await.unwrap();
        assert!(missing.is_none());

        let err = provider.get_config(&PoolRequest::new("broken")).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(ref r) if r == "render failed"));
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let provider = StaticProvider::new().with_document("master", json!({}));
        let res = provider.get_config(&PoolRequest::new("Master")).await.unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn test_later_registration_wins() {
        let provider = StaticProvider::new()
            .with_failure("worker", "boom")
            .with_document("worker", json!({}));
        assert_eq!(provider.len(), 1);
        assert!(provider.failures.is_empty());
    }
}
