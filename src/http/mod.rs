//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → middleware/access_log.rs (log + metrics around the handler)
//!     → routing (path/method dispatch, provider call)
//!     → response.rs (status, headers, body framing)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::{ConfigResponse, ProviderFailure, APPLICATION_JSON};
pub use server::{build_app, HttpServer};
