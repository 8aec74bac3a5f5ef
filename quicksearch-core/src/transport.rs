//! Trait definition for pluggable batch search transports.
//!
//! The coordinator never talks HTTP directly: it hands a [`SearchRequest`]
//! to a [`SearchTransport`] and interprets the reply. The production
//! implementation is [`crate::http::HostedSearchClient`].

use std::future::Future;
use std::sync::Arc;

use crate::error::SearchError;
use crate::types::{BatchResponse, SearchRequest};

/// Sends one batched multi-index request.
///
/// Outcomes map onto the coordinator's error taxonomy:
///
/// - `Err(_)`: the transport failed (connection, status, timeout).
/// - `Ok(BatchResponse { results: None })`: the service answered without
///   a results collection.
/// - `Ok(BatchResponse { results: Some(_) })`: usable per-index results.
///
/// Requests are spawned onto the Tokio runtime, so implementations must be
/// `Send + Sync + 'static`.
pub trait SearchTransport: Send + Sync + 'static {
    /// Send every query in `request` as a single network call.
    fn send_batch(
        &self,
        request: SearchRequest,
    ) -> impl Future<Output = Result<BatchResponse, SearchError>> + Send;
}

impl<T: SearchTransport> SearchTransport for Arc<T> {
    fn send_batch(
        &self,
        request: SearchRequest,
    ) -> impl Future<Output = Result<BatchResponse, SearchError>> + Send {
        (**self).send_batch(request)
    }
}
