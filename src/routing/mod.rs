//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → matcher.rs (config path? extract pool)
//!     → router.rs (method check, provider call)
//!     → ConfigResponse
//! ```
//!
//! # Design Decisions
//! - Path classification happens before the method check
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always yields the same dispatch

pub mod matcher;
pub mod router;

pub use matcher::{classify, PathClass};
pub use router::{dispatch, ConfigRouter, Dispatch};
