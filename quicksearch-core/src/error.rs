//! Error types for the quicksearch-core crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. API keys never appear in error messages.

/// Errors that can occur while searching or rendering results.
///
/// `Clone` so that a failure can be broadcast to every subscriber of a
/// [`crate::QueryCoordinator`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The transport could not complete the batch request.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The service answered, but without a usable results collection.
    #[error("empty or malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A result group template failed to compile or render.
    #[error("render error: {0}")]
    Render(String),
}

/// Convenience type alias for quicksearch-core results.
pub type Result<T> = std::result::Result<T, SearchError>;

impl From<minijinja::Error> for SearchError {
    fn from(err: minijinja::Error) -> Self {
        Self::Render(err.to_string())
    }
}
