//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] carries the hosted-search credentials, the index prefix,
//! the options shared by every index query, and transport behaviour. A
//! config missing any credential produces a disabled coordinator rather than
//! an error.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::SearchError;
use crate::types::SearchOptions;

/// Configuration for a [`crate::QueryCoordinator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Hosted search application id.
    pub app_id: Option<String>,
    /// Search-only API key.
    pub api_key: Option<String>,
    /// Prepended to each category key to form its index name.
    pub prefix: Option<String>,
    /// Options sent with every index query of a batch.
    pub options: SearchOptions,
    /// HTTP transport behaviour.
    pub transport: TransportOptions,
    /// Maximum hits rendered per category.
    pub result_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            api_key: None,
            prefix: None,
            options: SearchOptions::new()
                .with("hitsPerPage", 5)
                .with("attributesToSnippet", json!(["content:30", "summary:30"])),
            transport: TransportOptions::default(),
            result_limit: 5,
        }
    }
}

/// Options for the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportOptions {
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Overrides `https://{app_id}-dsn.algolia.net`.
    pub base_url: Option<String>,
    /// Custom User-Agent string.
    pub user_agent: Option<String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 8,
            base_url: None,
            user_agent: None,
        }
    }
}

/// The three settings a live coordinator cannot work without.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub api_key: String,
    pub prefix: String,
}

impl SearchConfig {
    /// Returns the credentials when `app_id`, `api_key`, and `prefix` are all
    /// present and non-empty.
    pub fn credentials(&self) -> Option<Credentials> {
        fn present(value: &Option<String>) -> Option<String> {
            value.as_deref().filter(|v| !v.is_empty()).map(str::to_owned)
        }
        Some(Credentials {
            app_id: present(&self.app_id)?,
            api_key: present(&self.api_key)?,
            prefix: present(&self.prefix)?,
        })
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `result_limit` must be greater than 0
    /// - `transport.timeout_seconds` must be greater than 0
    /// - `transport.base_url`, when set, must be an absolute URL
    ///
    /// Missing credentials are not an error; they disable searching.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.result_limit == 0 {
            return Err(SearchError::Config(
                "result_limit must be greater than 0".into(),
            ));
        }
        if self.transport.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if let Some(ref base) = self.transport.base_url {
            url::Url::parse(base)
                .map_err(|e| SearchError::Config(format!("invalid base_url {base:?}: {e}")))?;
        }
        Ok(())
    }
}
