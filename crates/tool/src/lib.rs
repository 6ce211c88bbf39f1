//! Model Context Premium tool library.
//!
//! Exposes a purchase-gated `search_private_data` tool that searches an
//! `OpenAI` vector store on behalf of an MCP host.
//!
//! # Security
//!
//! This crate handles the site's `OpenAI` API key. It is only ever held as a
//! [`secrecy::SecretString`] and never logged.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod config;
pub mod credentials;
pub mod error;
pub mod openai;
pub mod settings;
pub mod tool;

pub use config::{ConfigError, PremiumConfig};
pub use error::ToolError;
pub use tool::{ToolInvoker, ToolResponse, tool_definition};
