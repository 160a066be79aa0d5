//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http access log middleware, provider reloads
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, separate listener)
//! ```
//!
//! # Design Decisions
//! - The config router itself never logs; the access log layer does
//! - Request ID flows through every log event for a request
//! - Metrics are optional and cost nothing until enabled

pub mod logging;
pub mod metrics;
