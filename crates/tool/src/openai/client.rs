//! `OpenAI` vector store search client.
//!
//! One call, one `POST {base}/vector_stores/{id}/search`. No retries and no
//! state beyond the underlying connection pool, so it is fine to build a
//! client per invocation.

use std::sync::Arc;
use std::time::Duration;

use mcp_premium_core::{SearchFilters, SearchRequest, SearchResult};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use url::Url;

use super::error::{VectorStoreError, upstream_message};

/// Default API base (trailing slash required for path joins).
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1/";
/// Request timeout. The only cancellation in the system.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const OPENAI_BETA_HEADER: &str = "OpenAI-Beta";
const OPENAI_BETA_VALUE: &str = "assistants=v2";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Vector store search client.
#[derive(Clone)]
pub struct VectorStoreClient {
    inner: Arc<VectorStoreClientInner>,
}

struct VectorStoreClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for VectorStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorStoreClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl VectorStoreClient {
    /// Create a client against the public `OpenAI` API.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the API key cannot be sent as a header, or
    /// `Transport` if the HTTP client cannot be built.
    pub fn new(api_key: &SecretString) -> Result<Self, VectorStoreError> {
        let base_url = Url::parse(OPENAI_API_BASE)
            .map_err(|e| VectorStoreError::InvalidInput(format!("invalid API base URL: {e}")))?;
        Self::with_options(api_key, base_url, REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit base URL and timeout.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer credential
    /// * `base_url` - API base, e.g. `https://api.openai.com/v1/`
    /// * `timeout` - Whole-request timeout
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the API key cannot be sent as a header, or
    /// `Transport` if the HTTP client cannot be built.
    pub fn with_options(
        api_key: &SecretString,
        base_url: Url,
        timeout: Duration,
    ) -> Result<Self, VectorStoreError> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret())).map_err(
                |_| VectorStoreError::InvalidInput("API key contains invalid characters".into()),
            )?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(
            OPENAI_BETA_HEADER,
            HeaderValue::from_static(OPENAI_BETA_VALUE),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(VectorStoreClientInner { client, base_url }),
        })
    }

    /// The API base this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Search a vector store.
    ///
    /// # Arguments
    ///
    /// * `store_id` - Vector store to search (e.g. `vs_abc123`)
    /// * `query` - Search text
    /// * `filters` - Optional filters, e.g. `{"file_ids": ["file_abc123"]}`
    /// * `limit` - Requested result count, clamped to `[1, 50]`
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `store_id` or `query` is empty (no request is made)
    /// - `Transport` on network failure or timeout
    /// - `Upstream` on a non-2xx response
    /// - `Decode` if a 2xx body is not a valid search result
    #[instrument(skip(self, query, filters))]
    pub async fn search(
        &self,
        store_id: &str,
        query: &str,
        filters: Option<SearchFilters>,
        limit: i64,
    ) -> Result<SearchResult, VectorStoreError> {
        let request = SearchRequest::new(store_id, query, filters, limit)?;
        self.execute(&request).await
    }

    /// Send an already validated request.
    ///
    /// # Errors
    ///
    /// Same as [`Self::search`], minus input validation.
    #[instrument(
        skip(self, request),
        fields(store_id = %request.store_id(), max_num_results = request.max_num_results())
    )]
    pub async fn execute(&self, request: &SearchRequest) -> Result<SearchResult, VectorStoreError> {
        let endpoint = self.search_endpoint(request.store_id())?;
        let body = serde_json::to_vec(request)
            .map_err(|e| VectorStoreError::InvalidInput(format!("unserializable request: {e}")))?;

        let response = self
            .inner
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "vector store search failed");
            return Err(VectorStoreError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body),
                body,
            });
        }

        let result: SearchResult =
            serde_json::from_str(&body).map_err(|e| VectorStoreError::Decode {
                message: e.to_string(),
                body: body.clone(),
            })?;

        tracing::debug!(
            results = result.data.len(),
            has_more = result.has_more,
            "vector store search completed"
        );
        Ok(result)
    }

    /// Build `{base}/vector_stores/{store_id}/search` with the ID as one
    /// percent-encoded path segment.
    fn search_endpoint(&self, store_id: &str) -> Result<Url, VectorStoreError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                VectorStoreError::InvalidInput(format!(
                    "API base URL cannot take a path: {}",
                    self.inner.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["vector_stores", store_id, "search"]);
        Ok(url)
    }
}
