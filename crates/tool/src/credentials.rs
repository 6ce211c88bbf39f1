//! `OpenAI` API key resolution.
//!
//! The key is looked up fresh on every call, in this order:
//!
//! 1. An explicit per-call override (e.g. `--api_key` on the command line)
//! 2. The process-wide constant (`MCP_OPENAI_API_KEY`)
//! 3. The persisted `openai_api_key` setting
//!
//! The first non-empty value wins.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::settings::{OPENAI_API_KEY, SettingsStore};

/// Errors that can occur while resolving a credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// No source produced a non-empty key.
    #[error(
        "OpenAI API key not found. Provide it via the --api_key option, set the \
         MCP_OPENAI_API_KEY environment variable, or store the 'openai_api_key' setting."
    )]
    Missing,
}

/// Where a resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Override,
    Constant,
    Settings,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Override => write!(f, "explicit override"),
            Self::Constant => write!(f, "MCP_OPENAI_API_KEY"),
            Self::Settings => write!(f, "settings"),
        }
    }
}

/// Resolves the `OpenAI` API key from its three sources.
#[derive(Clone)]
pub struct CredentialResolver {
    constant: Option<SecretString>,
    settings: Arc<dyn SettingsStore>,
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("constant", &self.constant.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl CredentialResolver {
    /// Create a resolver.
    ///
    /// # Arguments
    ///
    /// * `constant` - Process-wide key, if defined
    /// * `settings` - Persisted settings store
    #[must_use]
    pub fn new(constant: Option<SecretString>, settings: Arc<dyn SettingsStore>) -> Self {
        Self { constant, settings }
    }

    /// Resolve the key, preferring a non-empty `explicit` override.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Missing` if every source is absent or empty.
    pub fn resolve(&self, explicit: Option<&str>) -> Result<SecretString, CredentialError> {
        self.resolve_with_source(explicit).map(|(key, _)| key)
    }

    /// Resolve the key and report which source supplied it.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Missing` if every source is absent or empty.
    pub fn resolve_with_source(
        &self,
        explicit: Option<&str>,
    ) -> Result<(SecretString, CredentialSource), CredentialError> {
        let resolved = explicit
            .filter(|key| !key.trim().is_empty())
            .map(|key| (SecretString::from(key.to_owned()), CredentialSource::Override))
            .or_else(|| {
                self.constant
                    .as_ref()
                    .filter(|key| !key.expose_secret().trim().is_empty())
                    .map(|key| (key.clone(), CredentialSource::Constant))
            })
            .or_else(|| {
                self.settings
                    .get(OPENAI_API_KEY)
                    .filter(|key| !key.trim().is_empty())
                    .map(|key| (SecretString::from(key), CredentialSource::Settings))
            });

        match resolved {
            Some((key, source)) => {
                tracing::debug!(%source, "resolved OpenAI API key");
                Ok((key, source))
            }
            None => {
                tracing::debug!("no OpenAI API key configured");
                Err(CredentialError::Missing)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn stored(value: Option<&str>) -> Arc<dyn SettingsStore> {
        let mut map = BTreeMap::new();
        if let Some(value) = value {
            map.insert(OPENAI_API_KEY.to_string(), value.to_string());
        }
        Arc::new(map)
    }

    fn resolve(
        explicit: Option<&str>,
        constant: Option<&str>,
        setting: Option<&str>,
    ) -> Result<(String, CredentialSource), CredentialError> {
        let resolver = CredentialResolver::new(
            constant.map(|c| SecretString::from(c.to_owned())),
            stored(setting),
        );
        resolver
            .resolve_with_source(explicit)
            .map(|(key, source)| (key.expose_secret().to_owned(), source))
    }

    #[test]
    fn test_override_wins() {
        assert_eq!(
            resolve(Some("A"), Some("B"), Some("C")),
            Ok(("A".to_string(), CredentialSource::Override))
        );
    }

    #[test]
    fn test_constant_beats_settings() {
        assert_eq!(
            resolve(None, Some("B"), Some("C")),
            Ok(("B".to_string(), CredentialSource::Constant))
        );
    }

    #[test]
    fn test_settings_used_last() {
        assert_eq!(
            resolve(None, None, Some("C")),
            Ok(("C".to_string(), CredentialSource::Settings))
        );
    }

    #[test]
    fn test_nothing_configured_is_missing() {
        assert_eq!(resolve(None, None, None), Err(CredentialError::Missing));
    }

    #[test]
    fn test_empty_values_are_skipped() {
        assert_eq!(
            resolve(Some(""), Some("  "), Some("C")),
            Ok(("C".to_string(), CredentialSource::Settings))
        );
        assert_eq!(
            resolve(Some(""), None, Some("")),
            Err(CredentialError::Missing)
        );
    }

    #[test]
    fn test_debug_redacts_constant() {
        let resolver =
            CredentialResolver::new(Some(SecretString::from("sk-secret-constant")), stored(None));
        let debug_output = format!("{resolver:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk-secret-constant"));
    }

    #[test]
    fn test_missing_message_names_all_sources() {
        let message = CredentialError::Missing.to_string();
        assert!(message.contains("--api_key"));
        assert!(message.contains("MCP_OPENAI_API_KEY"));
        assert!(message.contains("openai_api_key"));
    }
}
