//! Path classification.
//!
//! # Responsibilities
//! - Decide whether a request path names a pool document
//! - Extract the pool identifier verbatim
//!
//! # Design Decisions
//! - Only the final path segment can be a pool identifier
//! - Anything may precede `/config/` (e.g. a path prefix added by a proxy)
//! - No decoding or case-folding; the identifier is handed on as received
//! - No regex to guarantee O(n) matching

use crate::provider::PoolRequest;

/// Path segment that introduces a pool identifier.
pub const CONFIG_SEGMENT: &str = "config";

/// Result of classifying a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathClass {
    /// `.../config/<pool>`
    Config(PoolRequest),
    /// Anything else.
    Other,
}

/// Classify a URI path (query string excluded).
pub fn classify(path: &str) -> PathClass {
    let Some((head, pool)) = path.rsplit_once('/') else {
        return PathClass::Other;
    };
    if pool.is_empty() {
        return PathClass::Other;
    }

    let names_config = match head.rsplit_once('/') {
        Some((_, segment)) => segment == CONFIG_SEGMENT,
        None => head == CONFIG_SEGMENT,
    };

    if names_config {
        PathClass::Config(PoolRequest::new(pool))
    } else {
        PathClass::Other
    }
}
