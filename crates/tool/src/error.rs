//! Unified error handling for the search tool.

use thiserror::Error;

use crate::credentials::CredentialError;
use crate::openai::VectorStoreError;

/// Everything that can stop a tool invocation.
///
/// None of these escape to the MCP host as faults; the invoker turns each
/// one into a [`ToolResponse`](crate::tool::ToolResponse).
#[derive(Debug, Error)]
pub enum ToolError {
    /// Empty query or store ID, malformed filters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No API key could be resolved.
    #[error(transparent)]
    MissingCredential(#[from] CredentialError),

    /// The vector store search failed.
    #[error(transparent)]
    Search(#[from] VectorStoreError),

    /// The caller may not use the tool.
    #[error("access denied")]
    AccessDenied {
        /// Where the caller can buy access, when derivable.
        purchase_url: Option<String>,
    },
}

impl ToolError {
    /// Short machine-readable kind, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) | Self::Search(VectorStoreError::InvalidInput(_)) => {
                "invalid_input"
            }
            Self::MissingCredential(_) => "missing_credential",
            Self::Search(VectorStoreError::Transport(_)) => "transport_failure",
            Self::Search(VectorStoreError::Upstream { .. }) => "upstream_error",
            Self::Search(VectorStoreError::Decode { .. }) => "decode_error",
            Self::AccessDenied { .. } => "access_denied",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_kinds() {
        assert_eq!(
            ToolError::InvalidInput("x".into()).kind(),
            "invalid_input"
        );
        assert_eq!(
            ToolError::from(CredentialError::Missing).kind(),
            "missing_credential"
        );
        assert_eq!(
            ToolError::from(VectorStoreError::Upstream {
                status: 400,
                message: None,
                body: String::new(),
            })
            .kind(),
            "upstream_error"
        );
        assert_eq!(
            ToolError::from(VectorStoreError::Decode {
                message: "eof".into(),
                body: String::new(),
            })
            .kind(),
            "decode_error"
        );
        assert_eq!(
            ToolError::AccessDenied { purchase_url: None }.kind(),
            "access_denied"
        );
    }

    #[test]
    fn test_tool_error_display_is_transparent() {
        let err = ToolError::from(VectorStoreError::Upstream {
            status: 400,
            message: Some("bad request".into()),
            body: String::new(),
        });
        assert_eq!(err.to_string(), "OpenAI API error: HTTP 400 - bad request");
    }
}
