//! Line-oriented bridge between a query stream and coordinator events.
//!
//! Each input line is the user's current query text and is handed to
//! [`QueryCoordinator::search`] unchanged. Every [`SearchEvent`] is written
//! as one JSON object per line:
//!
//! ```text
//! {"event":"clear"}
//! {"event":"error","message":"transport failure: HTTP 503 ..."}
//! {"event":"results","results":{"guides":{"index":"site_guides","hits":[...]}},"html":"<section ..."}
//! ```
//!
//! At end of input the bridge waits for in-flight requests and flushes
//! whatever they emit before returning.

use std::time::Duration;

use quicksearch_core::{
    NormalizedResults, QueryCoordinator, ResultRenderer, SearchEvent, SearchTransport,
};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use crate::error::Result;

/// How often the end-of-input drain rechecks for outstanding requests.
const DRAIN_POLL: Duration = Duration::from_millis(20);

/// One output line.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventEnvelope<'a> {
    Clear,
    Error {
        message: String,
    },
    Results {
        results: &'a NormalizedResults,
        #[serde(skip_serializing_if = "Option::is_none")]
        html: Option<String>,
    },
}

impl<'a> EventEnvelope<'a> {
    /// Wrap an event, rendering HTML for results when a renderer is given.
    /// A render failure is logged and the raw results are still sent.
    pub fn from_event(event: &'a SearchEvent, renderer: Option<&ResultRenderer>) -> Self {
        match event {
            SearchEvent::Clear => Self::Clear,
            SearchEvent::Error(err) => Self::Error {
                message: err.to_string(),
            },
            SearchEvent::Results(results) => {
                let html = renderer.and_then(|r| match r.render(results) {
                    Ok(html) => Some(html),
                    Err(e) => {
                        tracing::warn!(error = %e, "result rendering failed");
                        None
                    }
                });
                Self::Results { results, html }
            }
        }
    }
}

/// Run the bridge until `reader` reaches end of input and every in-flight
/// request has settled.
///
/// # Errors
///
/// Returns an error if reading, encoding, or writing fails.
pub async fn run_bridge<T, R, W>(
    coordinator: &QueryCoordinator<T>,
    renderer: Option<&ResultRenderer>,
    reader: R,
    mut writer: W,
) -> Result<()>
where
    T: SearchTransport,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut events = coordinator.subscribe();
    let mut lines = reader.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(query) => {
                    let outcome = coordinator.search(&query);
                    tracing::debug!(?outcome, "query submitted");
                }
                None => break,
            },
            event = events.recv() => match event {
                Ok(event) => write_event(&mut writer, &event, renderer).await?,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "bridge fell behind; events dropped");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    drain(coordinator, &mut events, &mut writer, renderer).await?;
    writer.flush().await?;
    Ok(())
}

/// Forward events until no request is left in flight.
async fn drain<T, W>(
    coordinator: &QueryCoordinator<T>,
    events: &mut Receiver<SearchEvent>,
    writer: &mut W,
    renderer: Option<&ResultRenderer>,
) -> Result<()>
where
    T: SearchTransport,
    W: AsyncWrite + Unpin,
{
    loop {
        match tokio::time::timeout(DRAIN_POLL, events.recv()).await {
            Ok(Ok(event)) => write_event(writer, &event, renderer).await?,
            Ok(Err(RecvError::Lagged(skipped))) => {
                tracing::warn!(skipped, "bridge fell behind; events dropped");
            }
            Ok(Err(RecvError::Closed)) => return Ok(()),
            Err(_) if coordinator.in_flight() == 0 => break,
            Err(_) => {}
        }
    }
    // A request may have finished between the timeout and the in-flight check.
    while let Ok(event) = events.try_recv() {
        write_event(writer, &event, renderer).await?;
    }
    Ok(())
}

async fn write_event<W: AsyncWrite + Unpin>(
    writer: &mut W,
    event: &SearchEvent,
    renderer: Option<&ResultRenderer>,
) -> Result<()> {
    let mut line = serde_json::to_string(&EventEnvelope::from_event(event, renderer))?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    tracing::trace!(kind = event.kind(), "event written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quicksearch_core::{
        BatchResponse, Hit, IndexResult, SearchError, SearchOptions, SearchRequest,
    };
    use serde_json::{Value, json};

    /// Answers every batch with one guide hit titled after the query.
    struct EchoTransport;

    impl SearchTransport for EchoTransport {
        async fn send_batch(
            &self,
            request: SearchRequest,
        ) -> std::result::Result<BatchResponse, SearchError> {
            let query = request.queries()[0].query.clone();
            Ok(BatchResponse {
                results: Some(vec![IndexResult {
                    index: "p_guides".into(),
                    hits: vec![Hit::from(json!({"title": query, "url": "u"}))],
                    ..Default::default()
                }]),
            })
        }
    }

    fn parse_lines(output: &[u8]) -> Vec<Value> {
        String::from_utf8(output.to_vec())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn clear_envelope() {
        let event = SearchEvent::Clear;
        let json = serde_json::to_value(EventEnvelope::from_event(&event, None)).unwrap();
        assert_eq!(json, json!({"event": "clear"}));
    }

    #[test]
    fn error_envelope_carries_message() {
        let event = SearchEvent::Error(SearchError::TransportFailure("HTTP 503".into()));
        let json = serde_json::to_value(EventEnvelope::from_event(&event, None)).unwrap();
        assert_eq!(
            json,
            json!({"event": "error", "message": "transport failure: HTTP 503"})
        );
    }

    #[test]
    fn results_envelope_without_renderer_omits_html() {
        let event = SearchEvent::Results(NormalizedResults::default());
        let json = serde_json::to_value(EventEnvelope::from_event(&event, None)).unwrap();
        assert_eq!(json, json!({"event": "results", "results": {}}));
    }

    #[tokio::test]
    async fn bridge_streams_clear_and_results() {
        let coordinator = QueryCoordinator::with_transport("p_", SearchOptions::new(), EchoTransport);
        let renderer = ResultRenderer::with_template(5, "<h3>{{ title }}</h3>").unwrap();
        let input: &[u8] = b"ab\r\nferris\n";
        let mut output = Vec::new();

        run_bridge(&coordinator, Some(&renderer), input, &mut output)
            .await
            .unwrap();

        let lines = parse_lines(&output);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], json!({"event": "clear"}));
        assert_eq!(lines[1]["event"], "results");
        assert_eq!(lines[1]["results"]["guides"]["hits"][0]["title"], "ferris");
        assert_eq!(lines[1]["html"], "<h3>Guides</h3>");
    }

    #[tokio::test]
    async fn bridge_skips_duplicate_lines() {
        let coordinator = QueryCoordinator::with_transport("p_", SearchOptions::new(), EchoTransport);
        let input: &[u8] = b"ab\nab\n";
        let mut output = Vec::new();

        run_bridge(&coordinator, None, input, &mut output).await.unwrap();

        assert_eq!(parse_lines(&output), vec![json!({"event": "clear"})]);
    }

    #[tokio::test]
    async fn disabled_bridge_writes_nothing() {
        let coordinator: QueryCoordinator = QueryCoordinator::disabled();
        let input: &[u8] = b"ab\nferris\n";
        let mut output = Vec::new();

        run_bridge(&coordinator, None, input, &mut output).await.unwrap();

        assert!(output.is_empty());
    }
}
