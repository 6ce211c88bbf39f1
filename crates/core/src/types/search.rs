//! Vector store search request and result types.
//!
//! These mirror the wire format of the `OpenAI` vector store search endpoint
//! (`POST /vector_stores/{id}/search`). Results are deserialized into typed
//! structs but keep every upstream shape intact so they can be relayed to the
//! caller unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest `max_num_results` the transport will send.
pub const MIN_RESULTS: u8 = 1;
/// Largest `max_num_results` the transport will send.
pub const MAX_RESULTS: u8 = 50;
/// Default result limit for direct searches.
pub const DEFAULT_LIMIT: i64 = 20;
/// Largest limit accepted on the command line (the transport still caps at 50).
pub const CLI_MAX_LIMIT: i64 = 100;

/// Clamp a caller-supplied limit into `[MIN_RESULTS, MAX_RESULTS]`.
#[must_use]
pub fn clamp_max_results(limit: i64) -> u8 {
    let clamped = limit.clamp(i64::from(MIN_RESULTS), i64::from(MAX_RESULTS));
    u8::try_from(clamped).unwrap_or(MAX_RESULTS)
}

/// Attribute filters, e.g. `{"file_ids": ["file_abc123"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchFilters(BTreeMap<String, Vec<String>>);

impl SearchFilters {
    /// Create filters from a map.
    #[must_use]
    pub const fn new(filters: BTreeMap<String, Vec<String>>) -> Self {
        Self(filters)
    }

    /// Whether no filter keys are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Access the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }
}

impl From<BTreeMap<String, Vec<String>>> for SearchFilters {
    fn from(filters: BTreeMap<String, Vec<String>>) -> Self {
        Self(filters)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, Vec<V>)> for SearchFilters {
    fn from_iter<I: IntoIterator<Item = (K, Vec<V>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}

/// Validation failures when building a [`SearchRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchRequestError {
    /// The vector store ID was empty.
    #[error("vector store ID must not be empty")]
    EmptyStoreId,
    /// The query was empty.
    #[error("search query must not be empty")]
    EmptyQuery,
}

/// A single vector store search, serialized as the request body.
///
/// `store_id` is part of the URL, not the body, so it is skipped during
/// serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    #[serde(skip)]
    store_id: String,
    query: String,
    max_num_results: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<SearchFilters>,
}

impl SearchRequest {
    /// Build a validated request.
    ///
    /// `limit` is clamped into `[1, 50]` and empty filters are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if `store_id` or `query` is empty or whitespace.
    pub fn new(
        store_id: impl Into<String>,
        query: impl Into<String>,
        filters: Option<SearchFilters>,
        limit: i64,
    ) -> Result<Self, SearchRequestError> {
        let store_id = store_id.into();
        let query = query.into();

        if store_id.trim().is_empty() {
            return Err(SearchRequestError::EmptyStoreId);
        }
        if query.trim().is_empty() {
            return Err(SearchRequestError::EmptyQuery);
        }

        Ok(Self {
            store_id,
            query,
            max_num_results: clamp_max_results(limit),
            filters: filters.filter(|f| !f.is_empty()),
        })
    }

    /// Vector store to search.
    #[must_use]
    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    /// Query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Clamped result count sent upstream.
    #[must_use]
    pub const fn max_num_results(&self) -> u8 {
        self.max_num_results
    }

    /// Filters, if any were supplied and non-empty.
    #[must_use]
    pub const fn filters(&self) -> Option<&SearchFilters> {
        self.filters.as_ref()
    }
}

/// The query the upstream actually searched for.
///
/// The endpoint may rewrite a query into several, in which case it returns
/// an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchQuery {
    Single(String),
    Multiple(Vec<String>),
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(query) => f.write_str(query),
            Self::Multiple(queries) => {
                let json = serde_json::to_string(queries).map_err(|_| std::fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

/// One chunk of content in a search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPart {
    /// Content type, currently always `text`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The text itself.
    pub text: String,
}

/// Content of a search hit: plain text or a list of typed parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl SearchContent {
    /// All text joined with newlines.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    pub file_id: String,
    pub filename: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Map<String, serde_json::Value>>,
    pub content: SearchContent,
}

/// A page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Upstream object type (e.g. `vector_store.search_results.page`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    pub search_query: SearchQuery,
    pub data: Vec<SearchItem>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
}

impl SearchResult {
    /// Whether the page contains no hits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_clamp_max_results_bounds() {
        assert_eq!(clamp_max_results(0), 1);
        assert_eq!(clamp_max_results(-5), 1);
        assert_eq!(clamp_max_results(1), 1);
        assert_eq!(clamp_max_results(20), 20);
        assert_eq!(clamp_max_results(50), 50);
        assert_eq!(clamp_max_results(100), 50);
        assert_eq!(clamp_max_results(1000), 50);
        assert_eq!(clamp_max_results(i64::MAX), 50);
    }

    #[test]
    fn test_request_rejects_empty_inputs() {
        assert_eq!(
            SearchRequest::new("", "hello", None, 10),
            Err(SearchRequestError::EmptyStoreId)
        );
        assert_eq!(
            SearchRequest::new("vs_1", "   ", None, 10),
            Err(SearchRequestError::EmptyQuery)
        );
    }

    #[test]
    fn test_request_body_omits_store_id_and_missing_filters() {
        let request = SearchRequest::new("vs_1", "refunds", None, 1000).expect("valid request");
        let body = serde_json::to_value(&request).expect("serialize");
        assert_eq!(body, json!({"query": "refunds", "max_num_results": 50}));
    }

    #[test]
    fn test_request_body_drops_empty_filters() {
        let request = SearchRequest::new("vs_1", "refunds", Some(SearchFilters::default()), 5)
            .expect("valid request");
        assert!(request.filters().is_none());
        let body = serde_json::to_value(&request).expect("serialize");
        assert!(body.get("filters").is_none());
    }

    #[test]
    fn test_request_body_includes_filters() {
        let filters: SearchFilters = [("file_ids", vec!["file_abc"])].into_iter().collect();
        let request =
            SearchRequest::new("vs_1", "refunds", Some(filters), 0).expect("valid request");
        let body = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            body,
            json!({"query": "refunds", "max_num_results": 1, "filters": {"file_ids": ["file_abc"]}})
        );
    }

    #[test]
    fn test_result_round_trips_unchanged() {
        let raw = json!({
            "search_query": "x",
            "data": [{"file_id": "f1", "filename": "a.txt", "score": 0.9, "content": "hi"}],
            "has_more": false,
            "next_page": null
        });
        let result: SearchResult = serde_json::from_value(raw.clone()).expect("deserialize");
        assert_eq!(serde_json::to_value(&result).expect("serialize"), raw);
    }

    #[test]
    fn test_result_accepts_upstream_content_parts_and_query_list() {
        let raw = json!({
            "object": "vector_store.search_results.page",
            "search_query": ["return policy", "refund window"],
            "data": [{
                "file_id": "file-1",
                "filename": "policy.md",
                "score": 0.75,
                "attributes": {"lang": "en"},
                "content": [{"type": "text", "text": "30 days"}, {"type": "text", "text": "no fee"}]
            }],
            "has_more": true,
            "next_page": "cursor_2"
        });
        let result: SearchResult = serde_json::from_value(raw.clone()).expect("deserialize");
        assert_eq!(
            result.search_query.to_string(),
            r#"["return policy","refund window"]"#
        );
        let item = result.data.first().expect("one item");
        assert_eq!(item.content.to_text(), "30 days\nno fee");
        assert_eq!(serde_json::to_value(&result).expect("serialize"), raw);
    }
}
