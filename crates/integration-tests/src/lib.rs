//! Integration tests for Model Context Premium.
//!
//! The `OpenAI` API is replaced by a local [`wiremock`] server, so the tests
//! need no network access or API key.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mcp-premium-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `vector_store_search` - Client wire format and error mapping
//! - `tool_invoker` - Gate, credential and search flow of the tool

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use mcp_premium_core::{ProductId, UserId};
use mcp_premium_tool::access::{AccessGate, AccessPolicy, PurchaseLedger};
use mcp_premium_tool::credentials::CredentialResolver;
use mcp_premium_tool::openai::{VectorStoreClient, VectorStoreError};
use mcp_premium_tool::settings::SettingsStore;
use mcp_premium_tool::tool::ToolInvoker;
use secrecy::SecretString;
use url::Url;
use wiremock::MockServer;

/// API key the mock server expects.
pub const TEST_API_KEY: &str = "sk-test-7Qm2xV9pL4";
/// Vector store searched in tests.
pub const TEST_STORE_ID: &str = "vs_test123";
/// Product that grants access in tests.
pub const TEST_PRODUCT: ProductId = ProductId::new(14);
/// User who bought [`TEST_PRODUCT`].
pub const BUYER: UserId = UserId::new(1);
/// Shop used for purchase links.
pub const SHOP_URL: &str = "https://shop.example.com/";

/// The mock server's `/v1/` base.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid URL.
#[must_use]
pub fn base_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/v1/", server.uri())).expect("mock server URI should parse")
}

/// Path of the search endpoint for `store_id`.
#[must_use]
pub fn search_path(store_id: &str) -> String {
    format!("/v1/vector_stores/{store_id}/search")
}

/// A client pointed at the mock server.
///
/// # Errors
///
/// Returns an error if the client cannot be built.
pub fn client(server: &MockServer, timeout: Duration) -> Result<VectorStoreClient, VectorStoreError> {
    VectorStoreClient::with_options(
        &SecretString::from(TEST_API_KEY),
        base_url(server),
        timeout,
    )
}

/// A realistic one-hit search page.
#[must_use]
pub fn search_page() -> serde_json::Value {
    serde_json::json!({
        "object": "vector_store.search_results.page",
        "search_query": "refund policy",
        "data": [
            {
                "file_id": "file-abc123",
                "filename": "refunds.md",
                "score": 0.91,
                "attributes": {"lang": "en"},
                "content": [
                    {"type": "text", "text": "Refunds are accepted within 30 days."}
                ]
            }
        ],
        "has_more": false,
        "next_page": null
    })
}

/// An empty search page.
#[must_use]
pub fn empty_page() -> serde_json::Value {
    serde_json::json!({
        "object": "vector_store.search_results.page",
        "search_query": "nothing here",
        "data": [],
        "has_more": false,
        "next_page": null
    })
}

/// A tool invoker against the mock server.
///
/// [`BUYER`] has purchased [`TEST_PRODUCT`]. Pass `None` as the key to leave
/// the credential unconfigured.
#[must_use]
pub fn invoker(server: &MockServer, policy: AccessPolicy, api_key: Option<&str>) -> ToolInvoker {
    let mut ledger = PurchaseLedger::new(Url::parse(SHOP_URL).ok());
    ledger.record(BUYER, TEST_PRODUCT);

    let mut settings = BTreeMap::new();
    if let Some(key) = api_key {
        settings.insert(
            mcp_premium_tool::settings::OPENAI_API_KEY.to_string(),
            key.to_string(),
        );
    }
    let settings: Arc<dyn SettingsStore> = Arc::new(settings);

    ToolInvoker::new(
        AccessGate::new(policy, Arc::new(ledger)),
        CredentialResolver::new(None, settings),
        TEST_STORE_ID,
        TEST_PRODUCT,
        base_url(server),
    )
    .with_timeout(Duration::from_secs(5))
}
