//! The `search_private_data` tool.
//!
//! An invocation runs four steps and stops at the first one that fails:
//!
//! 1. **Validate** - the query must be non-empty
//! 2. **Authorize** - the [`AccessGate`] must allow the caller
//! 3. **Resolve credential** - an `OpenAI` API key must be configured
//! 4. **Search** - one vector store request with a fixed result limit
//!
//! Every outcome, including failures, is returned as a [`ToolResponse`];
//! nothing is retried.

mod response;

use std::time::Duration;

use mcp_premium_core::{Caller, ProductId, SearchResult};
use serde::Serialize;
use tracing::instrument;
use url::Url;

use crate::access::{AccessDecision, AccessGate};
use crate::credentials::CredentialResolver;
use crate::error::ToolError;
use crate::openai::{REQUEST_TIMEOUT, VectorStoreClient};

pub use response::{
    CREDENTIAL_NOT_CONFIGURED, MISSING_QUERY, NO_RESULTS, PAYMENT_REQUIRED, ToolResponse,
};

/// Name the tool is registered under.
pub const TOOL_NAME: &str = "search_private_data";
/// Results requested per tool invocation.
pub const TOOL_RESULT_LIMIT: i64 = 10;

/// Registration record for an MCP host.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// Operation type; this tool only reads.
    #[serde(rename = "type")]
    pub kind: String,
    /// JSON Schema for the tool's arguments.
    pub input_schema: serde_json::Value,
}

/// The tool's registration record.
#[must_use]
pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_NAME.to_string(),
        description: "Search premium private content. Requires a purchase of the premium \
                      product or an eligible account."
            .to_string(),
        kind: "read".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for in the private content"
                }
            },
            "required": ["query"]
        }),
    }
}

/// Runs the search tool for a caller.
#[derive(Debug, Clone)]
pub struct ToolInvoker {
    gate: AccessGate,
    credentials: CredentialResolver,
    store_id: String,
    product_id: ProductId,
    base_url: Url,
    timeout: Duration,
}

impl ToolInvoker {
    /// Create an invoker.
    ///
    /// # Arguments
    ///
    /// * `gate` - Access policy and entitlements
    /// * `credentials` - API key resolver
    /// * `store_id` - Vector store every invocation searches
    /// * `product_id` - Product that grants access
    /// * `base_url` - `OpenAI` API base
    #[must_use]
    pub fn new(
        gate: AccessGate,
        credentials: CredentialResolver,
        store_id: impl Into<String>,
        product_id: ProductId,
        base_url: Url,
    ) -> Self {
        Self {
            gate,
            credentials,
            store_id: store_id.into(),
            product_id,
            base_url,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the tool with arguments as received from the MCP host.
    ///
    /// A missing or non-string `query` counts as empty.
    pub async fn invoke_json(&self, arguments: &serde_json::Value, caller: &Caller) -> ToolResponse {
        let query = arguments
            .get("query")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        self.invoke(query, caller).await
    }

    /// Run the tool.
    #[instrument(skip(self, query, caller), fields(store_id = %self.store_id, product_id = %self.product_id))]
    pub async fn invoke(&self, query: &str, caller: &Caller) -> ToolResponse {
        match self.run(query, caller).await {
            Ok(result) => ToolResponse::from(result),
            Err(err) => {
                match &err {
                    ToolError::AccessDenied { .. } | ToolError::InvalidInput(_) => {
                        tracing::info!(kind = err.kind(), "tool invocation rejected");
                    }
                    _ => tracing::warn!(kind = err.kind(), error = %err, "tool invocation failed"),
                }
                ToolResponse::from(err)
            }
        }
    }

    async fn run(&self, query: &str, caller: &Caller) -> Result<SearchResult, ToolError> {
        if query.trim().is_empty() {
            return Err(ToolError::InvalidInput(MISSING_QUERY.to_string()));
        }

        if let AccessDecision::Denied { purchase_url } =
            self.gate.authorize(caller, self.product_id)
        {
            return Err(ToolError::AccessDenied { purchase_url });
        }

        let api_key = self.credentials.resolve(None)?;

        let client = VectorStoreClient::with_options(&api_key, self.base_url.clone(), self.timeout)?;
        let result = client
            .search(&self.store_id, query, None, TOOL_RESULT_LIMIT)
            .await?;

        Ok(result)
    }
}
