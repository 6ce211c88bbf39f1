//! Caller-facing payloads of the search tool.

use mcp_premium_core::{SearchItem, SearchQuery, SearchResult};
use serde::Serialize;

use crate::error::ToolError;

/// Returned for an empty or missing query.
pub const MISSING_QUERY: &str = "missing query";
/// Returned when no API key is configured.
pub const CREDENTIAL_NOT_CONFIGURED: &str = "credential not configured";
/// Returned when access is denied.
pub const PAYMENT_REQUIRED: &str = "payment_required";
/// Returned when the search matched nothing.
pub const NO_RESULTS: &str = "No results found.";

const ACCESS_FALLBACK_MESSAGE: &str = "Access to this tool requires a purchase or an \
     eligible account. Please contact the site owner to get access.";

/// Response handed back to the MCP host. Serializes to a plain JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolResponse {
    /// Search hits.
    Results {
        search_query: SearchQuery,
        data: Vec<SearchItem>,
        has_more: bool,
        next_page: Option<String>,
    },
    /// A plain message, e.g. no results.
    Message { result: String },
    /// Access denied, with a way to get access.
    PaymentRequired {
        error: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        purchase_url: Option<String>,
    },
    /// Any other failure.
    Error {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<serde_json::Value>,
    },
}

impl ToolResponse {
    /// An error without details.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
            details: None,
        }
    }

    /// A payment/permission required response.
    #[must_use]
    pub fn payment_required(purchase_url: Option<String>) -> Self {
        let message = purchase_url.as_ref().map_or_else(
            || ACCESS_FALLBACK_MESSAGE.to_string(),
            |url| format!("Access to this tool requires a purchase. Buy access at {url}"),
        );
        Self::PaymentRequired {
            error: PAYMENT_REQUIRED.to_string(),
            message,
            purchase_url,
        }
    }

    /// Whether this response reports a failure or denial.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. } | Self::PaymentRequired { .. })
    }

    /// Serialize to a JSON value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "error": format!("failed to serialize response: {e}") })
        })
    }
}

impl From<SearchResult> for ToolResponse {
    fn from(result: SearchResult) -> Self {
        if result.is_empty() {
            return Self::Message {
                result: NO_RESULTS.to_string(),
            };
        }
        Self::Results {
            search_query: result.search_query,
            data: result.data,
            has_more: result.has_more,
            next_page: result.next_page,
        }
    }
}

impl From<ToolError> for ToolResponse {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::InvalidInput(message) => Self::error(message),
            ToolError::MissingCredential(_) => Self::error(CREDENTIAL_NOT_CONFIGURED),
            ToolError::AccessDenied { purchase_url } => Self::payment_required(purchase_url),
            ToolError::Search(e) => Self::Error {
                error: e.to_string(),
                details: Some(e.details()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::credentials::CredentialError;
    use crate::openai::VectorStoreError;

    #[test]
    fn test_results_shape() {
        let result: SearchResult = serde_json::from_value(json!({
            "object": "vector_store.search_results.page",
            "search_query": "x",
            "data": [{"file_id": "f1", "filename": "a.txt", "score": 0.9, "content": "hi"}],
            "has_more": false,
            "next_page": null
        }))
        .expect("deserialize");

        assert_eq!(
            ToolResponse::from(result).to_json(),
            json!({
                "search_query": "x",
                "data": [{"file_id": "f1", "filename": "a.txt", "score": 0.9, "content": "hi"}],
                "has_more": false,
                "next_page": null
            })
        );
    }

    #[test]
    fn test_empty_results_message() {
        let result: SearchResult = serde_json::from_value(json!({
            "search_query": "x", "data": [], "has_more": false, "next_page": null
        }))
        .expect("deserialize");
        assert_eq!(
            ToolResponse::from(result).to_json(),
            json!({"result": "No results found."})
        );
    }

    #[test]
    fn test_missing_credential_shape() {
        let response = ToolResponse::from(ToolError::from(CredentialError::Missing));
        assert_eq!(response.to_json(), json!({"error": "credential not configured"}));
        assert!(response.is_error());
    }

    #[test]
    fn test_search_error_carries_details() {
        let response = ToolResponse::from(ToolError::from(VectorStoreError::Upstream {
            status: 400,
            message: Some("bad request".into()),
            body: r#"{"error":{"message":"bad request"}}"#.into(),
        }));
        assert_eq!(
            response.to_json(),
            json!({
                "error": "OpenAI API error: HTTP 400 - bad request",
                "details": {"status": 400, "body": "{\"error\":{\"message\":\"bad request\"}}"}
            })
        );
    }

    #[test]
    fn test_payment_required_with_link() {
        let url = "https://shop.example.com/?add-to-cart=14".to_string();
        let response = ToolResponse::payment_required(Some(url.clone()));
        let json = response.to_json();
        assert_eq!(json["error"], "payment_required");
        assert_eq!(json["purchase_url"], url.as_str());
        assert!(
            json["message"]
                .as_str()
                .is_some_and(|m| m.contains(&url))
        );
    }

    #[test]
    fn test_payment_required_fallback_text() {
        let json = ToolResponse::payment_required(None).to_json();
        assert_eq!(json["error"], "payment_required");
        assert!(json.get("purchase_url").is_none());
        assert!(
            json["message"]
                .as_str()
                .is_some_and(|m| !m.is_empty())
        );
    }
}
