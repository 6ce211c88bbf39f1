//! File-backed purchase ledger.
//!
//! Exported from the store as a JSON object mapping user IDs to the product
//! IDs they have bought:
//!
//! ```json
//! { "1": [14], "7": [14, 31] }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use mcp_premium_core::{ProductId, UserId};
use thiserror::Error;
use url::Url;

use super::Entitlements;

/// Errors that can occur while loading a ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read purchase ledger {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("purchase ledger {} is malformed: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("purchase ledger {} has a non-numeric user ID: {key}", .path.display())]
    InvalidUserId { path: PathBuf, key: String },
}

/// Purchases known to the store, plus where to send non-buyers.
#[derive(Debug, Clone, Default)]
pub struct PurchaseLedger {
    purchases: HashMap<UserId, HashSet<ProductId>>,
    shop_url: Option<Url>,
}

impl PurchaseLedger {
    /// An empty ledger: nobody has purchased anything.
    #[must_use]
    pub fn new(shop_url: Option<Url>) -> Self {
        Self {
            purchases: HashMap::new(),
            shop_url,
        }
    }

    /// Load purchases from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a map of
    /// user ID to product ID list.
    pub fn load(path: &Path, shop_url: Option<Url>) -> Result<Self, LedgerError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: HashMap<String, Vec<ProductId>> =
            serde_json::from_str(&contents).map_err(|source| LedgerError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut ledger = Self::new(shop_url);
        for (key, products) in raw {
            let user: UserId = key.parse().map_err(|_| LedgerError::InvalidUserId {
                path: path.to_path_buf(),
                key: key.clone(),
            })?;
            for product in products {
                ledger.record(user, product);
            }
        }

        tracing::debug!(
            path = %path.display(),
            customers = ledger.purchases.len(),
            "loaded purchase ledger"
        );
        Ok(ledger)
    }

    /// Record a purchase.
    pub fn record(&mut self, user: UserId, product: ProductId) {
        self.purchases.entry(user).or_default().insert(product);
    }
}

impl Entitlements for PurchaseLedger {
    fn has_purchased(&self, user: UserId, product: ProductId) -> bool {
        self.purchases
            .get(&user)
            .is_some_and(|products| products.contains(&product))
    }

    /// Product `0` means no product is configured, so there is nothing to link to.
    fn purchase_url(&self, product: ProductId) -> Option<String> {
        if product == ProductId::default() {
            return None;
        }
        let mut url = self.shop_url.clone()?;
        url.query_pairs_mut()
            .clear()
            .append_pair("add-to-cart", &product.to_string());
        Some(url.into())
    }
}
