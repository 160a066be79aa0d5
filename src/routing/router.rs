//! Request dispatch.
//!
//! # Responsibilities
//! - Apply the path/method matrix
//! - Call the provider for GET and HEAD on config paths
//! - Hand the provider result to response materialization
//!
//! # Design Decisions
//! - Path is classified before the method is checked
//! - Stateless: the only shared value is the provider behind an Arc
//! - No logging, retries or caching here; the outer layers own those

use std::sync::Arc;

use axum::http::Method;

use crate::http::response::ConfigResponse;
use crate::provider::{ConfigProvider, PoolRequest};
use crate::routing::matcher::{classify, PathClass};

/// What the router will do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Path does not name a pool document.
    NotFound,
    /// Config path, but neither GET nor HEAD.
    MethodNotAllowed,
    /// Fetch the pool document. `head` drops the body after materialization.
    Fetch { request: PoolRequest, head: bool },
}

/// Decide how to handle `method` on `path`.
pub fn dispatch(method: &Method, path: &str) -> Dispatch {
    let request = match classify(path) {
        PathClass::Config(request) => request,
        PathClass::Other => return Dispatch::NotFound,
    };

    if *method == Method::GET {
        Dispatch::Fetch { request, head: false }
    } else if *method == Method::HEAD {
        Dispatch::Fetch { request, head: true }
    } else {
        Dispatch::MethodNotAllowed
    }
}

/// Maps `(method, path)` to a response using a [`ConfigProvider`].
pub struct ConfigRouter<P> {
    provider: Arc<P>,
}

impl<P> Clone for ConfigRouter<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
        }
    }
}

impl<P: ConfigProvider> ConfigRouter<P> {
    pub fn new(provider: P) -> Self {
        Self::from_shared(Arc::new(provider))
    }

    /// Build a router over a provider that is also used elsewhere.
    pub fn from_shared(provider: Arc<P>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Handle one request.
    pub async fn handle(&self, method: &Method, path: &str) -> ConfigResponse {
        match dispatch(method, path) {
            Dispatch::NotFound => ConfigResponse::not_found(),
            Dispatch::MethodNotAllowed => ConfigResponse::method_not_allowed(),
            Dispatch::Fetch { request, head } => {
                let result = self.provider.get_config(&request).await;
                let response = ConfigResponse::from_provider_result(&request, result);
                if head {
                    response.without_body()
                } else {
                    response
                }
            }
        }
    }
}
