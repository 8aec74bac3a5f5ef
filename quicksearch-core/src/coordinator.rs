//! Query coordination: suppression, batched dispatch, and stale-response fencing.
//!
//! [`QueryCoordinator::search`] decides whether a query is ignored, clears
//! the results, or is dispatched as one batch covering every category. Each
//! dispatch bumps a generation counter and captures the new value; when the
//! reply arrives it is only acted on if no newer dispatch happened in the
//! meantime. In-flight requests are never cancelled: superseded requests run
//! to completion and their replies are dropped (fire-and-forget with
//! generation fencing).
//!
//! Outcomes are published as [`SearchEvent`]s on a broadcast channel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http::HostedSearchClient;
use crate::transport::SearchTransport;
use crate::types::{BatchResponse, NormalizedResults, SearchOptions, SearchRequest};

/// Shortest query, in characters, that is sent to the service.
pub const MIN_QUERY_CHARS: usize = 3;

/// Events buffered per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 64;

/// A lifecycle signal for UI code.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// The query became too short; show no results.
    Clear,
    /// The current search failed.
    Error(SearchError),
    /// The current search completed.
    Results(NormalizedResults),
}

impl SearchEvent {
    /// Stable lowercase name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Error(_) => "error",
            Self::Results(_) => "results",
        }
    }
}

/// What [`QueryCoordinator::search`] did with a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No credentials were configured; the coordinator never searches.
    Disabled,
    /// Same text as the previous call; nothing happened.
    Duplicate,
    /// Too short to search; a [`SearchEvent::Clear`] was emitted.
    Cleared,
    /// A batch request was spawned under this generation.
    Dispatched { generation: u64 },
}

/// Coordinates queries against a [`SearchTransport`].
///
/// Must be used from within a Tokio runtime: dispatched requests are spawned
/// onto it.
pub struct QueryCoordinator<T: SearchTransport = HostedSearchClient> {
    events: broadcast::Sender<SearchEvent>,
    active: Option<Arc<Active<T>>>,
}

struct Active<T> {
    transport: T,
    prefix: String,
    options: SearchOptions,
    state: Mutex<State>,
    in_flight: AtomicUsize,
    events: broadcast::Sender<SearchEvent>,
}

#[derive(Debug, Default)]
struct State {
    generation: u64,
    last_query: Option<String>,
}

impl QueryCoordinator<HostedSearchClient> {
    /// Build a coordinator backed by the hosted search HTTP client.
    ///
    /// When `app_id`, `api_key`, or `prefix` is missing the coordinator is
    /// permanently disabled and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the config fails validation, or
    /// [`SearchError::TransportFailure`] if the HTTP client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let Some(creds) = config.credentials() else {
            tracing::warn!("search credentials not configured - search disabled");
            return Ok(Self::disabled());
        };
        let client = HostedSearchClient::new(creds.app_id, creds.api_key, &config.transport)?;
        Ok(Self::with_transport(
            creds.prefix,
            config.options.clone(),
            client,
        ))
    }
}

impl<T: SearchTransport> QueryCoordinator<T> {
    /// A coordinator that ignores every query.
    pub fn disabled() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            events,
            active: None,
        }
    }

    /// A coordinator sending batches through `transport`, querying
    /// `prefix + category key` for every category with the shared `options`.
    pub fn with_transport(
        prefix: impl Into<String>,
        options: SearchOptions,
        transport: T,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let active = Active {
            transport,
            prefix: prefix.into(),
            options,
            state: Mutex::new(State::default()),
            in_flight: AtomicUsize::new(0),
            events: events.clone(),
        };
        Self {
            events,
            active: Some(Arc::new(active)),
        }
    }

    /// Whether this coordinator can search at all.
    pub fn is_enabled(&self) -> bool {
        self.active.is_some()
    }

    /// Subscribe to events. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    /// The generation of the most recent dispatch (0 before the first).
    pub fn generation(&self) -> u64 {
        self.active
            .as_ref()
            .map_or(0, |active| active.lock_state().generation)
    }

    /// Dispatched requests whose replies have not been handled yet,
    /// superseded ones included.
    pub fn in_flight(&self) -> usize {
        self.active
            .as_ref()
            .map_or(0, |active| active.in_flight.load(Ordering::SeqCst))
    }

    /// Submit the user's current query text.
    ///
    /// Returns immediately; a dispatched search reports back through
    /// [`subscribe`](Self::subscribe).
    pub fn search(&self, query: &str) -> Dispatch {
        let Some(active) = self.active.as_ref() else {
            return Dispatch::Disabled;
        };

        let generation = {
            let mut state = active.lock_state();
            if state.last_query.as_deref() == Some(query) {
                return Dispatch::Duplicate;
            }
            state.last_query = Some(query.to_owned());

            if query.chars().count() < MIN_QUERY_CHARS {
                active.emit(SearchEvent::Clear);
                return Dispatch::Cleared;
            }

            state.generation += 1;
            state.generation
        };

        tracing::trace!(query, generation, "dispatching search");
        let request = SearchRequest::for_categories(&active.prefix, query, &active.options);

        active.in_flight.fetch_add(1, Ordering::SeqCst);
        let task = Arc::clone(active);
        tokio::spawn(async move {
            let reply = task.transport.send_batch(request).await;
            task.complete(generation, reply);
            task.in_flight.fetch_sub(1, Ordering::SeqCst);
        });

        Dispatch::Dispatched { generation }
    }
}

impl<T> Active<T> {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle a reply captured under `generation`.
    ///
    /// The state lock is held through emission so a newer dispatch cannot
    /// slip in between the generation check and the event.
    fn complete(&self, generation: u64, reply: Result<BatchResponse, SearchError>) {
        let state = self.lock_state();
        if state.generation != generation {
            tracing::trace!(
                generation,
                current = state.generation,
                "discarding stale search response"
            );
            return;
        }

        let event = match reply {
            Err(err) => {
                tracing::warn!(generation, error = %err, "search batch failed");
                SearchEvent::Error(err)
            }
            Ok(BatchResponse { results: None }) => {
                tracing::warn!(generation, "search batch returned no results collection");
                SearchEvent::Error(SearchError::MalformedResponse(
                    "no results returned".into(),
                ))
            }
            Ok(BatchResponse {
                results: Some(results),
            }) => {
                let normalized = NormalizedResults::from_index_results(results, &self.prefix);
                tracing::debug!(
                    generation,
                    categories = normalized.len(),
                    "search batch completed"
                );
                SearchEvent::Results(normalized)
            }
        };
        self.emit(event);
    }

    fn emit(&self, event: SearchEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("search event dropped: no subscribers");
        }
    }
}
