//! CLI command implementations.

pub mod settings;
pub mod tool;
pub mod vector_store;

use mcp_premium_core::RoleParseError;
use mcp_premium_tool::ConfigError;
use mcp_premium_tool::credentials::CredentialError;
use mcp_premium_tool::settings::SettingsError;
use thiserror::Error;

/// Errors that can end a command with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Settings file could not be read or written.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// No API key from any source.
    #[error(transparent)]
    MissingCredential(#[from] CredentialError),

    /// `--filters` was not a JSON object of string arrays.
    #[error("Invalid JSON provided for --filters: {0}")]
    InvalidFilters(#[source] serde_json::Error),

    /// The search could not be attempted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The search request failed.
    #[error("OpenAI API Error: {message} Details: {details}")]
    Api {
        message: String,
        details: serde_json::Value,
    },

    /// `--user` was not a numeric ID.
    #[error("Invalid user ID: {0}")]
    InvalidUserId(String),

    /// `--role` was not a known role.
    #[error(transparent)]
    InvalidRole(#[from] RoleParseError),

    /// Output could not be rendered.
    #[error("Failed to render output: {0}")]
    Output(#[source] serde_json::Error),
}
