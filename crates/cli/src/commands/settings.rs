//! Settings commands.
//!
//! # Usage
//!
//! ```bash
//! # Store the OpenAI API key (sanitized before saving)
//! mcp-premium settings set-api-key sk-...
//!
//! # Show stored settings
//! mcp-premium settings show
//! ```
//!
//! The settings file is `MCP_SETTINGS_PATH` (default: mcp-settings.json).

use std::collections::BTreeMap;

use mcp_premium_tool::PremiumConfig;
use mcp_premium_tool::settings::OPENAI_API_KEY;

use super::CommandError;

/// Store the `OpenAI` API key in the settings file.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read or written.
pub fn set_api_key(config: &PremiumConfig, key: &str) -> Result<(), CommandError> {
    let mut settings = config.settings()?;
    let stored = settings.set(OPENAI_API_KEY, key)?;

    if stored.is_empty() {
        tracing::warn!("API key is empty after sanitizing; searches will fail until it is set");
    }
    tracing::info!(path = %settings.path().display(), "saved OpenAI API key");
    Ok(())
}

/// Print the stored settings with the API key redacted.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read.
pub fn show(config: &PremiumConfig) -> Result<(), CommandError> {
    let settings = config.settings()?;
    let rendered = serde_json::to_string_pretty(&redacted(settings.values()))
        .map_err(CommandError::Output)?;

    #[allow(clippy::print_stdout)]
    {
        println!("Settings file: {}", settings.path().display());
        println!("{rendered}");
        if config.openai_api_key.is_some() {
            println!("MCP_OPENAI_API_KEY is set and takes precedence over the stored key.");
        }
    }
    Ok(())
}

fn redacted(values: &BTreeMap<String, String>) -> BTreeMap<&str, String> {
    values
        .iter()
        .map(|(key, value)| {
            let shown = if key == OPENAI_API_KEY && !value.is_empty() {
                mask(value)
            } else {
                value.clone()
            };
            (key.as_str(), shown)
        })
        .collect()
}

/// Keep a short prefix so keys can be told apart.
fn mask(value: &str) -> String {
    let prefix: String = value.chars().take(3).collect();
    format!("{prefix}...[REDACTED]")
}
