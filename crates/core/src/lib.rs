//! Model Context Premium Core - Shared types library.
//!
//! This crate provides common types used across all Model Context Premium components:
//! - `tool` - Vector store client, access gate and the `search_private_data` tool
//! - `cli` - Command-line tools for searching and managing settings
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no settings
//! storage. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, roles, caller identity and search wire types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
