//! `OpenAI` vector store integration.
//!
//! # Features
//!
//! - Search a vector store by ID with optional attribute filters
//! - Result count clamped to the API's `[1, 50]` window before sending
//! - Typed errors separating transport failures, upstream HTTP errors and
//!   undecodable success bodies
//!
//! # Example
//!
//! ```rust,ignore
//! let client = VectorStoreClient::new(&api_key)?;
//! let result = client.search("vs_abc123", "What is our return policy?", None, 20).await?;
//! for item in &result.data {
//!     println!("{} ({:.2})", item.filename, item.score);
//! }
//! ```

pub mod client;
pub mod error;

pub use client::{OPENAI_API_BASE, REQUEST_TIMEOUT, VectorStoreClient};
pub use error::VectorStoreError;
