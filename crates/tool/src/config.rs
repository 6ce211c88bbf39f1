//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MCP_OPENAI_API_KEY` - Site-wide `OpenAI` API key (takes precedence over settings)
//! - `MCP_SETTINGS_PATH` - Persisted settings file (default: mcp-settings.json)
//! - `MCP_VECTOR_STORE_ID` - Vector store searched by the tool (required to invoke it)
//! - `MCP_PRODUCT_ID` - Product that grants access (default: 0)
//! - `MCP_ACCESS_POLICY` - `allow_all`, `administrator` or `purchase` (default: purchase)
//! - `MCP_SHOP_URL` - Store URL used to build purchase links
//! - `MCP_PURCHASES_PATH` - Purchase ledger JSON file
//! - `OPENAI_BASE_URL` - API base (default: <https://api.openai.com/v1/>)

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use mcp_premium_core::ProductId;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::access::{AccessGate, AccessPolicy, LedgerError, PurchaseLedger};
use crate::credentials::CredentialResolver;
use crate::openai::OPENAI_API_BASE;
use crate::settings::{JsonFileSettings, SettingsError, SettingsStore};
use crate::tool::ToolInvoker;

const DEFAULT_SETTINGS_PATH: &str = "mcp-settings.json";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Tool configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct PremiumConfig {
    /// Site-wide API key
    pub openai_api_key: Option<SecretString>,
    /// Persisted settings file
    pub settings_path: PathBuf,
    /// Vector store searched by the tool
    pub vector_store_id: Option<String>,
    /// Product that grants access
    pub product_id: ProductId,
    /// Who may invoke the tool
    pub access_policy: AccessPolicy,
    /// Store URL used to build purchase links
    pub shop_url: Option<Url>,
    /// Purchase ledger file
    pub purchases_path: Option<PathBuf>,
    /// `OpenAI` API base
    pub openai_base_url: Url,
}

impl std::fmt::Debug for PremiumConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PremiumConfig")
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("settings_path", &self.settings_path)
            .field("vector_store_id", &self.vector_store_id)
            .field("product_id", &self.product_id)
            .field("access_policy", &self.access_policy)
            .field("shop_url", &self.shop_url.as_ref().map(Url::as_str))
            .field("purchases_path", &self.purchases_path)
            .field("openai_base_url", &self.openai_base_url.as_str())
            .finish()
    }
}

impl PremiumConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let openai_api_key = get("MCP_OPENAI_API_KEY").map(|key| {
            if let Err(e) = validate_secret_strength(&key, "MCP_OPENAI_API_KEY") {
                tracing::warn!("MCP_OPENAI_API_KEY validation warning: {e}");
            }
            SecretString::from(key)
        });

        let product_id = get("MCP_PRODUCT_ID")
            .map(|v| v.parse::<ProductId>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("MCP_PRODUCT_ID".to_string(), e.to_string()))?
            .unwrap_or_default();

        let access_policy = get("MCP_ACCESS_POLICY")
            .map(|v| v.parse::<AccessPolicy>())
            .transpose()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MCP_ACCESS_POLICY".to_string(), e.to_string())
            })?
            .unwrap_or_default();

        let shop_url = get("MCP_SHOP_URL")
            .map(|v| parse_url("MCP_SHOP_URL", &v))
            .transpose()?;

        let openai_base_url = parse_url(
            "OPENAI_BASE_URL",
            &get("OPENAI_BASE_URL").unwrap_or_else(|| OPENAI_API_BASE.to_string()),
        )?;

        Ok(Self {
            openai_api_key,
            settings_path: get("MCP_SETTINGS_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH), PathBuf::from),
            vector_store_id: get("MCP_VECTOR_STORE_ID"),
            product_id,
            access_policy,
            shop_url,
            purchases_path: get("MCP_PURCHASES_PATH").map(PathBuf::from),
            openai_base_url,
        })
    }

    /// Open the persisted settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn settings(&self) -> Result<JsonFileSettings, SettingsError> {
        JsonFileSettings::open(&self.settings_path)
    }

    /// Build a credential resolver over the given settings.
    #[must_use]
    pub fn credential_resolver(&self, settings: Arc<dyn SettingsStore>) -> CredentialResolver {
        CredentialResolver::new(self.openai_api_key.clone(), settings)
    }

    /// Build the access gate, loading the purchase ledger if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger file cannot be loaded.
    pub fn access_gate(&self) -> Result<AccessGate, LedgerError> {
        let ledger = match &self.purchases_path {
            Some(path) => PurchaseLedger::load(path, self.shop_url.clone())?,
            None => PurchaseLedger::new(self.shop_url.clone()),
        };
        Ok(AccessGate::new(self.access_policy.clone(), Arc::new(ledger)))
    }

    /// Build the tool invoker from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no vector store is configured, or if the settings
    /// or ledger files cannot be loaded.
    pub fn tool_invoker(&self) -> Result<ToolInvoker, ConfigError> {
        let store_id = self
            .vector_store_id
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("MCP_VECTOR_STORE_ID".to_string()))?;
        let settings: Arc<dyn SettingsStore> = Arc::new(self.settings()?);

        Ok(ToolInvoker::new(
            self.access_gate()?,
            self.credential_resolver(settings),
            store_id,
            self.product_id,
            self.openai_base_url.clone(),
        ))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
