//! Error types for the quicksearch host.

use quicksearch_core::SearchError;

/// Top-level error type for the host bridge.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Configuration file or environment error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error on the config file or the stdio streams.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Coordinator or renderer construction error.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Event envelope serialization error.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, HostError>;
