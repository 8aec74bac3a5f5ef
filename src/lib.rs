//! quicksearch: search-as-you-type host.
//!
//! Drives a [`quicksearch_core::QueryCoordinator`] from a line-oriented
//! query stream and writes its events as JSON lines:
//! stdin (queries) → coordinator → hosted search → stdout (events)
//!
//! # Architecture
//!
//! - **Config**: TOML file plus `QUICKSEARCH_*` environment overrides
//! - **Coordinator**: batching, suppression, and stale-response fencing
//!   live in `quicksearch-core`
//! - **Bridge**: forwards queries in and events out, rendering HTML for
//!   result events when enabled

pub mod bridge;
pub mod config;
pub mod error;

pub use bridge::{EventEnvelope, run_bridge};
pub use config::{HostConfig, RenderConfig};
pub use error::{HostError, Result};
