//! # quicksearch-core
//!
//! Search-as-you-type against a hosted, multi-index search service.
//!
//! ## Design
//!
//! - One batch request per query, covering every category index
//!   (`prefix + key`) with shared options
//! - Queries shorter than three characters clear the results instead of
//!   searching; repeating the previous query does nothing
//! - Generation fencing: each dispatch bumps a counter, and replies captured
//!   under an older generation are dropped unseen. Nothing is cancelled
//! - Outcomes are broadcast as [`SearchEvent`]s (`Clear`, `Error`, `Results`)
//! - Results render to HTML per category through a replaceable template
//!
//! ## Security
//!
//! - Only a search-only API key is expected; it never appears in errors or logs
//! - Query text is logged only at trace level
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> quicksearch_core::Result<()> {
//! use quicksearch_core::{QueryCoordinator, SearchConfig, SearchEvent};
//!
//! let config = SearchConfig {
//!     app_id: Some("APPID".into()),
//!     api_key: Some("search-only-key".into()),
//!     prefix: Some("site_".into()),
//!     ..Default::default()
//! };
//! let coordinator = QueryCoordinator::from_config(&config)?;
//! let mut events = coordinator.subscribe();
//!
//! coordinator.search("async runtime");
//! if let Ok(SearchEvent::Results(results)) = events.recv().await {
//!     for (category, result) in results.iter() {
//!         println!("{category}: {} hits", result.hits.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod category;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod render;
pub mod transport;
pub mod types;

pub use category::IndexCategory;
pub use config::{SearchConfig, TransportOptions};
pub use coordinator::{Dispatch, QueryCoordinator, SearchEvent};
pub use error::{Result, SearchError};
pub use http::HostedSearchClient;
pub use render::ResultRenderer;
pub use transport::SearchTransport;
pub use types::{BatchResponse, Hit, IndexResult, NormalizedResults, SearchOptions, SearchRequest};
