//! Error types for the `OpenAI` vector store client.

use mcp_premium_core::SearchRequestError;
use serde_json::json;
use thiserror::Error;

/// Errors that can occur when searching a vector store.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    /// The request could not be built (empty store ID or query, bad API key).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request never produced an HTTP response (network, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error(
        "OpenAI API error: HTTP {status}{}",
        .message.as_deref().map(|m| format!(" - {m}")).unwrap_or_default()
    )]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// `error.message` from the body, or the raw body if it was not JSON.
        message: Option<String>,
        /// Raw response body.
        body: String,
    },

    /// The API answered 2xx but the body was not a valid search result.
    #[error("failed to decode JSON response from OpenAI API: {message}")]
    Decode {
        /// Parser error.
        message: String,
        /// Raw response body.
        body: String,
    },
}

impl VectorStoreError {
    /// HTTP status associated with the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidInput(_) | Self::Decode { .. } => None,
        }
    }

    /// Raw response body, if one was received.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Upstream { body, .. } | Self::Decode { body, .. } => Some(body),
            Self::InvalidInput(_) | Self::Transport(_) => None,
        }
    }

    /// Whether the transport gave up because the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Diagnostic details (`status`, `body`) for caller-facing payloads.
    #[must_use]
    pub fn details(&self) -> serde_json::Value {
        let mut details = serde_json::Map::new();
        if let Some(status) = self.status() {
            details.insert("status".to_string(), json!(status));
        }
        if let Some(body) = self.body() {
            details.insert("body".to_string(), json!(body));
        }
        serde_json::Value::Object(details)
    }
}

impl From<SearchRequestError> for VectorStoreError {
    fn from(err: SearchRequestError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Error envelope returned by the `OpenAI` API.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Error message.
    pub message: String,
}

/// Pick the most useful message out of an error body.
#[must_use]
pub fn upstream_message(body: &str) -> Option<String> {
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(body) {
        return Some(api_error.error.message);
    }
    (!body.is_empty()).then(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_display_with_message() {
        let err = VectorStoreError::Upstream {
            status: 400,
            message: Some("bad request".to_string()),
            body: r#"{"error":{"message":"bad request"}}"#.to_string(),
        };
        assert_eq!(err.to_string(), "OpenAI API error: HTTP 400 - bad request");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_upstream_error_display_without_message() {
        let err = VectorStoreError::Upstream {
            status: 502,
            message: None,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "OpenAI API error: HTTP 502");
    }

    #[test]
    fn test_upstream_message_prefers_json_error() {
        let body = r#"{"error":{"message":"No vector store found","type":"invalid_request_error"}}"#;
        assert_eq!(
            upstream_message(body).as_deref(),
            Some("No vector store found")
        );
    }

    #[test]
    fn test_upstream_message_falls_back_to_raw_body() {
        assert_eq!(
            upstream_message("Service Unavailable").as_deref(),
            Some("Service Unavailable")
        );
        assert_eq!(upstream_message(""), None);
    }

    #[test]
    fn test_details_includes_status_and_body() {
        let err = VectorStoreError::Upstream {
            status: 404,
            message: None,
            body: "nope".to_string(),
        };
        assert_eq!(err.details(), json!({"status": 404, "body": "nope"}));

        let err = VectorStoreError::Decode {
            message: "expected value".to_string(),
            body: "<html>".to_string(),
        };
        assert_eq!(err.details(), json!({"body": "<html>"}));
    }

    #[test]
    fn test_request_errors_map_to_invalid_input() {
        let err = VectorStoreError::from(SearchRequestError::EmptyQuery);
        assert!(matches!(err, VectorStoreError::InvalidInput(_)));
    }
}
