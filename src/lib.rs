//! Machine Config Server Library
//!
//! Serves per-pool machine bootstrap configuration documents over HTTP.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod provider;
pub mod routing;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use provider::{ConfigProvider, PoolRequest, ProviderError};
pub use routing::ConfigRouter;
