//! Core types for batch requests, per-index results, and normalized result sets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::category::IndexCategory;

/// A single record returned by the hosted search service.
///
/// Hits are open JSON objects; the index schema is owned by whoever feeds
/// the indexes. Accessors cover the fields the renderer and the category
/// section labels read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hit(pub Map<String, Value>);

impl Hit {
    /// Returns a top-level string field, if present and a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Returns the highlighted snippet for `attribute`
    /// (`_snippetResult.<attribute>.value`).
    pub fn snippet(&self, attribute: &str) -> Option<&str> {
        self.0
            .get("_snippetResult")?
            .get(attribute)?
            .get("value")?
            .as_str()
    }

    /// Sets a top-level field, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }
}

impl From<Value> for Hit {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

/// Results for one index within a batch response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexResult {
    /// Full index name, including the configured prefix.
    pub index: String,
    /// Matching records, best first.
    #[serde(default)]
    pub hits: Vec<Hit>,
    /// Any other per-index metadata the service returns (`nbHits`, paging, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a successful multi-index response.
///
/// `results` is optional: a reply that decodes but carries no results
/// collection is reported as a malformed response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Option<Vec<IndexResult>>,
}

/// Search parameters shared by every query in a batch (`hitsPerPage`,
/// `attributesToSnippet`, ...). Passed through to the service untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchOptions(pub Map<String, Value>);

impl SearchOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one option.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One `(indexName, query, options)` entry of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
    pub index_name: String,
    pub query: String,
    pub options: SearchOptions,
}

/// An ordered batch of index queries sent as one network call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    queries: Vec<IndexQuery>,
}

impl SearchRequest {
    /// Starts an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the batch covering every registered category: one query per
    /// category against `prefix + key`, all sharing `query` and `options`.
    pub fn for_categories(prefix: &str, query: &str, options: &SearchOptions) -> Self {
        let mut request = Self::new();
        for category in IndexCategory::all() {
            request.add_query(format!("{prefix}{}", category.key()), query, options.clone());
        }
        request
    }

    /// Appends a query to the batch.
    pub fn add_query(
        &mut self,
        index_name: impl Into<String>,
        query: impl Into<String>,
        options: SearchOptions,
    ) {
        self.queries.push(IndexQuery {
            index_name: index_name.into(),
            query: query.into(),
            options,
        });
    }

    pub fn queries(&self) -> &[IndexQuery] {
        &self.queries
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

/// Per-category results keyed by category key (`guides`, `blog-posts`, ...).
///
/// Only categories with at least one hit are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedResults(BTreeMap<String, IndexResult>);

impl NormalizedResults {
    /// Normalizes a batch's per-index results.
    ///
    /// The category key is the index name with `prefix` stripped; an index
    /// name that does not carry the prefix is kept as-is. Results with no
    /// hits are dropped.
    pub fn from_index_results(results: Vec<IndexResult>, prefix: &str) -> Self {
        let map = results
            .into_iter()
            .filter(|result| !result.hits.is_empty())
            .map(|result| {
                let key = result
                    .index
                    .strip_prefix(prefix)
                    .unwrap_or(&result.index)
                    .to_owned();
                (key, result)
            })
            .collect();
        Self(map)
    }

    /// Returns the entry for a category key.
    pub fn get(&self, key: &str) -> Option<&IndexResult> {
        self.0.get(key)
    }

    /// Returns the entry for a registered category.
    pub fn category(&self, category: IndexCategory) -> Option<&IndexResult> {
        self.get(category.key())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexResult)> {
        self.0.iter().map(|(key, result)| (key.as_str(), result))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(value: Value) -> Hit {
        Hit::from(value)
    }

    fn index_result(index: &str, hits: Vec<Hit>) -> IndexResult {
        IndexResult {
            index: index.into(),
            hits,
            extra: Map::new(),
        }
    }

    #[test]
    fn hit_str_field() {
        let h = hit(json!({"group": "Cloud", "count": 3}));
        assert_eq!(h.str_field("group"), Some("Cloud"));
        assert_eq!(h.str_field("count"), None);
        assert_eq!(h.str_field("missing"), None);
    }

    #[test]
    fn hit_snippet_reads_nested_value() {
        let h = hit(json!({
            "_snippetResult": {
                "content": {"value": "a <em>match</em>", "matchLevel": "full"}
            }
        }));
        assert_eq!(h.snippet("content"), Some("a <em>match</em>"));
        assert_eq!(h.snippet("summary"), None);
    }

    #[test]
    fn hit_from_non_object_is_empty() {
        let h = Hit::from(json!("not an object"));
        assert!(h.0.is_empty());
    }

    #[test]
    fn batch_response_without_results_decodes() {
        let resp: BatchResponse = serde_json::from_str(r#"{"message":"ok"}"#).expect("decode");
        assert!(resp.results.is_none());
    }

    #[test]
    fn index_result_keeps_extra_metadata() {
        let result: IndexResult = serde_json::from_value(json!({
            "index": "site_guides",
            "hits": [{"title": "Intro"}],
            "nbHits": 1
        }))
        .expect("decode");
        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.extra.get("nbHits"), Some(&json!(1)));
    }

    #[test]
    fn request_for_categories_covers_registry_in_order() {
        let options = SearchOptions::new().with("hitsPerPage", 5);
        let request = SearchRequest::for_categories("site_", "tokio", &options);

        let names: Vec<&str> = request
            .queries()
            .iter()
            .map(|q| q.index_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "site_guides",
                "site_documentation",
                "site_blog-posts",
                "site_examples",
                "site_other"
            ]
        );
        assert!(request
            .queries()
            .iter()
            .all(|q| q.query == "tokio" && q.options == options));
    }

    #[test]
    fn normalize_strips_prefix_and_drops_empty_categories() {
        let h1 = hit(json!({"title": "h1"}));
        let results = vec![
            index_result("prefix_guides", vec![h1.clone()]),
            index_result("prefix_other", vec![]),
        ];

        let normalized = NormalizedResults::from_index_results(results, "prefix_");

        assert_eq!(normalized.len(), 1);
        assert_eq!(
            normalized.get("guides"),
            Some(&index_result("prefix_guides", vec![h1]))
        );
        assert!(normalized.get("other").is_none());
        assert!(normalized.category(IndexCategory::Guides).is_some());
    }

    #[test]
    fn normalize_keeps_unprefixed_index_name() {
        let results = vec![index_result("guides", vec![hit(json!({}))])];
        let normalized = NormalizedResults::from_index_results(results, "prefix_");
        assert_eq!(normalized.keys().collect::<Vec<_>>(), vec!["guides"]);
    }

    #[test]
    fn normalize_empty_batch() {
        let normalized = NormalizedResults::from_index_results(vec![], "prefix_");
        assert!(normalized.is_empty());
    }

    #[test]
    fn normalized_results_serialize_as_map() {
        let results = vec![index_result("p_examples", vec![hit(json!({"title": "x"}))])];
        let normalized = NormalizedResults::from_index_results(results, "p_");
        let value = serde_json::to_value(&normalized).expect("serialize");
        assert_eq!(value["examples"]["index"], json!("p_examples"));
        assert_eq!(value["examples"]["hits"][0]["title"], json!("x"));
    }
}
