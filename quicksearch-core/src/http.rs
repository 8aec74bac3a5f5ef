//! HTTP transport for the hosted search multi-query endpoint.
//!
//! [`HostedSearchClient`] sends a whole [`SearchRequest`] as one
//! `POST /1/indexes/*/queries` call, authenticated with the application id
//! and search-only API key headers.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::config::TransportOptions;
use crate::error::SearchError;
use crate::transport::SearchTransport;
use crate::types::{BatchResponse, IndexQuery, SearchRequest};

const APPLICATION_ID_HEADER: &str = "X-Algolia-Application-Id";
const API_KEY_HEADER: &str = "X-Algolia-API-Key";
const QUERIES_PATH: &str = "/1/indexes/*/queries";
const DEFAULT_USER_AGENT: &str = concat!("quicksearch/", env!("CARGO_PKG_VERSION"));

/// Multi-query client for the hosted search service.
#[derive(Clone)]
pub struct HostedSearchClient {
    client: reqwest::Client,
    app_id: String,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for HostedSearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostedSearchClient")
            .field("app_id", &self.app_id)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Wire form of the batch body.
#[derive(Debug, Serialize)]
struct BatchBody {
    requests: Vec<WireQuery>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireQuery {
    index_name: String,
    params: String,
}

impl HostedSearchClient {
    /// Build a client for `app_id` / `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::TransportFailure`] if the HTTP client cannot be
    /// constructed.
    pub fn new(
        app_id: impl Into<String>,
        api_key: impl Into<String>,
        options: &TransportOptions,
    ) -> Result<Self, SearchError> {
        let app_id = app_id.into();
        let base_url = match options.base_url {
            Some(ref custom) => custom.trim_end_matches('/').to_owned(),
            None => format!("https://{}-dsn.algolia.net", app_id.to_lowercase()),
        };
        Ok(Self {
            client: build_client(options)?,
            app_id,
            api_key: api_key.into(),
            base_url,
        })
    }

    /// The endpoint batches are posted to.
    pub fn endpoint(&self) -> String {
        format!("{}{QUERIES_PATH}", self.base_url)
    }
}

impl SearchTransport for HostedSearchClient {
    async fn send_batch(&self, request: SearchRequest) -> Result<BatchResponse, SearchError> {
        let body = BatchBody {
            requests: request.queries().iter().map(wire_query).collect(),
        };
        tracing::debug!(queries = body.requests.len(), "sending search batch");

        let response = self
            .client
            .post(self.endpoint())
            .header(APPLICATION_ID_HEADER, &self.app_id)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::TransportFailure(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read body".into());
            tracing::warn!(%status, "search batch rejected");
            return Err(SearchError::TransportFailure(format!(
                "HTTP {status}: {detail}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SearchError::TransportFailure(format!("response read failed: {e}")))?;

        tracing::trace!(bytes = bytes.len(), "search batch response received");

        serde_json::from_slice(&bytes)
            .map_err(|e| SearchError::MalformedResponse(format!("invalid JSON body: {e}")))
    }
}

/// Build a [`reqwest::Client`] for batch requests.
///
/// # Errors
///
/// Returns [`SearchError::TransportFailure`] if the client cannot be constructed.
pub fn build_client(options: &TransportOptions) -> Result<reqwest::Client, SearchError> {
    let ua = options
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    reqwest::Client::builder()
        .timeout(Duration::from_secs(options.timeout_seconds))
        .user_agent(ua)
        .build()
        .map_err(|e| SearchError::TransportFailure(format!("failed to build HTTP client: {e}")))
}

fn wire_query(query: &IndexQuery) -> WireQuery {
    WireQuery {
        index_name: query.index_name.clone(),
        params: encode_params(query),
    }
}

/// URL-encode the query text followed by each option. String options are
/// sent verbatim, everything else JSON-encoded.
fn encode_params(query: &IndexQuery) -> String {
    let mut params = url::form_urlencoded::Serializer::new(String::new());
    params.append_pair("query", &query.query);
    for (name, value) in query.options.iter() {
        match value {
            Value::String(s) => params.append_pair(name, s),
            other => params.append_pair(name, &other.to_string()),
        };
    }
    params.finish()
}
