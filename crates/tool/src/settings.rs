//! Persisted plugin settings.
//!
//! Settings live in a flat JSON object on disk (by default
//! `mcp-settings.json`), e.g.:
//!
//! ```json
//! { "openai_api_key": "sk-..." }
//! ```
//!
//! Values are sanitized on write the same way for every key: tags are
//! stripped, whitespace runs collapse to one space, and the ends are trimmed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Settings key holding the `OpenAI` API key.
pub const OPENAI_API_KEY: &str = "openai_api_key";

/// Read access to a key-value settings store.
pub trait SettingsStore: Send + Sync {
    /// Get a setting value, if present.
    fn get(&self, key: &str) -> Option<String>;
}

impl SettingsStore for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

/// Error type for settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {} is not a JSON object of strings: {source}", .path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileSettings {
    /// Open the settings file. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                SettingsError::Serialization {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "settings file not found, using empty settings");
                BTreeMap::new()
            }
            Err(source) => return Err(SettingsError::Io { path, source }),
        };

        Ok(Self { path, values })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored values.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Sanitize and store a value, then write the file.
    ///
    /// Returns the sanitized value that was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn set(&mut self, key: &str, value: &str) -> Result<String, SettingsError> {
        let sanitized = sanitize_text_field(value);
        self.values.insert(key.to_string(), sanitized.clone());
        self.save()?;
        Ok(sanitized)
    }

    /// Remove a value, then write the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn remove(&mut self, key: &str) -> Result<Option<String>, SettingsError> {
        let previous = self.values.remove(key);
        self.save()?;
        Ok(previous)
    }

    fn save(&self) -> Result<(), SettingsError> {
        let contents = serde_json::to_string_pretty(&self.values).map_err(|source| {
            SettingsError::Serialization {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, contents).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SettingsStore for JsonFileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Clean a single-line text value: strip tags, collapse whitespace, trim.
///
/// A `<` that does not open a tag is kept, escaped as `&lt;`.
#[must_use]
pub fn sanitize_text_field(input: &str) -> String {
    let mut stripped = String::with_capacity(input.len());
    let mut in_tag = false;
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '<' if in_tag => {}
            '<' if chars.peek().is_some_and(|&next| opens_tag(next)) => in_tag = true,
            '<' => stripped.push_str("&lt;"),
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_control() => stripped.push(' '),
            c => stripped.push(c),
        }
    }

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `c` can follow `<` at the start of a tag, comment or declaration.
const fn opens_tag(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?')
}
