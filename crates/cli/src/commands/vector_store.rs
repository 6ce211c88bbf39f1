//! Vector store commands.
//!
//! # Usage
//!
//! ```bash
//! mcp-premium vs search <store_id> <query> [--filters=<json>] [--limit=<n>] [--api_key=<key>]
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use mcp_premium_core::{CLI_MAX_LIMIT, DEFAULT_LIMIT, MIN_RESULTS, SearchFilters, SearchResult};
use mcp_premium_tool::PremiumConfig;
use mcp_premium_tool::openai::{REQUEST_TIMEOUT, VectorStoreClient, VectorStoreError};
use mcp_premium_tool::settings::SettingsStore;
use serde_json::json;

use super::CommandError;

/// Arguments of `vs search`.
#[derive(Debug)]
pub struct SearchArgs {
    pub store_id: String,
    pub query: String,
    pub filters: Option<String>,
    pub limit: i64,
    pub api_key: Option<String>,
}

/// Search a vector store and print the hits.
///
/// # Errors
///
/// Returns an error if no API key is available, `--filters` is malformed,
/// or the search fails.
pub async fn search(config: &PremiumConfig, args: SearchArgs) -> Result<(), CommandError> {
    let settings = settings_for(config, args.api_key.as_deref())?;
    let api_key = config
        .credential_resolver(settings)
        .resolve(args.api_key.as_deref())?;

    let filters = parse_filters(args.filters.as_deref())?;
    let limit = effective_limit(args.limit);

    tracing::debug!(
        store_id = %args.store_id,
        limit,
        has_filters = filters.is_some(),
        "searching vector store"
    );

    let client =
        VectorStoreClient::with_options(&api_key, config.openai_base_url.clone(), REQUEST_TIMEOUT)
            .map_err(api_error)?;
    let result = client
        .search(&args.store_id, &args.query, filters, limit)
        .await
        .map_err(api_error)?;

    tracing::debug!(hits = result.data.len(), "vector store search returned");

    let lines = render(&result).map_err(CommandError::Output)?;
    #[allow(clippy::print_stdout)]
    {
        for line in lines {
            println!("{line}");
        }
    }
    Ok(())
}

/// Settings backing the key lookup. The file is only read when no
/// `--api_key` override is given.
fn settings_for(
    config: &PremiumConfig,
    api_key: Option<&str>,
) -> Result<Arc<dyn SettingsStore>, CommandError> {
    if api_key.is_some_and(|key| !key.trim().is_empty()) {
        return Ok(Arc::new(BTreeMap::<String, String>::new()));
    }
    Ok(Arc::new(config.settings()?))
}

/// Parse `--filters`. An empty object counts as no filters.
fn parse_filters(raw: Option<&str>) -> Result<Option<SearchFilters>, CommandError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let filters: SearchFilters = serde_json::from_str(raw).map_err(CommandError::InvalidFilters)?;
    Ok((!filters.is_empty()).then_some(filters))
}

/// Apply the command-line range check; the client clamps further.
fn effective_limit(limit: i64) -> i64 {
    if (i64::from(MIN_RESULTS)..=CLI_MAX_LIMIT).contains(&limit) {
        limit
    } else {
        tracing::warn!(
            limit,
            "Limit must be between {MIN_RESULTS} and {CLI_MAX_LIMIT}. Using default {DEFAULT_LIMIT}."
        );
        DEFAULT_LIMIT
    }
}

fn api_error(err: VectorStoreError) -> CommandError {
    match err {
        VectorStoreError::InvalidInput(message) => CommandError::InvalidInput(message),
        VectorStoreError::Upstream {
            status,
            ref message,
            ..
        } => CommandError::Api {
            message: message
                .clone()
                .unwrap_or_else(|| format!("HTTP {status}")),
            details: err.details(),
        },
        other => CommandError::Api {
            message: other.to_string(),
            details: other.details(),
        },
    }
}

/// Output lines for a result page.
fn render(result: &SearchResult) -> Result<Vec<String>, serde_json::Error> {
    let mut lines = Vec::new();

    if result.is_empty() {
        lines.push("No results found.".to_string());
    } else {
        lines.push(format!("Search query: {}", result.search_query));
        let rows: Vec<_> = result
            .data
            .iter()
            .map(|item| {
                json!({
                    "file_id": item.file_id,
                    "filename": item.filename,
                    "score": item.score,
                    "content": item.content.to_text(),
                })
            })
            .collect();
        lines.push(serde_json::to_string_pretty(&rows)?);
        lines.push(format!(
            "Has more: {}",
            if result.has_more { "Yes" } else { "No" }
        ));
        if let Some(cursor) = &result.next_page {
            lines.push(format!("Next page cursor: {cursor}"));
        }
    }

    lines.push("Success: Vector store search completed.".to_string());
    Ok(lines)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn result(value: serde_json::Value) -> SearchResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_effective_limit_in_range() {
        assert_eq!(effective_limit(1), 1);
        assert_eq!(effective_limit(75), 75);
        assert_eq!(effective_limit(100), 100);
    }

    #[test]
    fn test_effective_limit_out_of_range_uses_default() {
        assert_eq!(effective_limit(0), 20);
        assert_eq!(effective_limit(-3), 20);
        assert_eq!(effective_limit(101), 20);
    }

    #[test]
    fn test_parse_filters() {
        assert!(parse_filters(None).unwrap().is_none());
        assert!(parse_filters(Some("{}")).unwrap().is_none());

        let filters = parse_filters(Some(r#"{"lang": ["en", "de"]}"#))
            .unwrap()
            .unwrap();
        assert_eq!(
            filters.as_map().get("lang"),
            Some(&vec!["en".to_string(), "de".to_string()])
        );
    }

    #[test]
    fn test_parse_filters_rejects_malformed_json() {
        let err = parse_filters(Some("{lang: en")).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Invalid JSON provided for --filters:")
        );
    }

    fn config_with_settings(path: &std::path::Path) -> PremiumConfig {
        let path = path.to_str().unwrap().to_string();
        PremiumConfig::from_lookup(|key| (key == "MCP_SETTINGS_PATH").then(|| path.clone())).unwrap()
    }

    #[test]
    fn test_api_key_override_skips_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mcp-settings.json");
        std::fs::write(&path, "{not json").unwrap();
        let config = config_with_settings(&path);

        assert!(settings_for(&config, Some("sk-override")).is_ok());
        assert!(matches!(
            settings_for(&config, None),
            Err(CommandError::Settings(_))
        ));
        assert!(matches!(
            settings_for(&config, Some("  ")),
            Err(CommandError::Settings(_))
        ));
    }

    #[test]
    fn test_render_hits() {
        let lines = render(&result(json!({
            "search_query": "refunds",
            "data": [{
                "file_id": "file-1",
                "filename": "policy.md",
                "score": 0.87,
                "content": [{"type": "text", "text": "Refunds within 30 days."}]
            }],
            "has_more": true,
            "next_page": "cursor-2"
        })))
        .unwrap();

        assert_eq!(lines.first().unwrap(), "Search query: refunds");
        let rows: serde_json::Value = serde_json::from_str(lines.get(1).unwrap()).unwrap();
        assert_eq!(rows[0]["content"], "Refunds within 30 days.");
        assert_eq!(rows[0]["file_id"], "file-1");
        assert_eq!(lines.get(2).unwrap(), "Has more: Yes");
        assert_eq!(lines.get(3).unwrap(), "Next page cursor: cursor-2");
        assert_eq!(
            lines.last().unwrap(),
            "Success: Vector store search completed."
        );
    }

    #[test]
    fn test_render_no_results() {
        let lines = render(&result(json!({
            "search_query": ["a", "b"],
            "data": [],
            "has_more": false,
            "next_page": null
        })))
        .unwrap();

        assert_eq!(
            lines,
            vec![
                "No results found.".to_string(),
                "Success: Vector store search completed.".to_string(),
            ]
        );
    }

    #[test]
    fn test_api_error_message() {
        let err = api_error(VectorStoreError::Upstream {
            status: 401,
            message: Some("Incorrect API key provided".into()),
            body: r#"{"error":{"message":"Incorrect API key provided"}}"#.into(),
        });
        let message = err.to_string();
        assert!(message.starts_with("OpenAI API Error: Incorrect API key provided Details: {"));
        assert!(message.contains("\"status\":401"));
    }
}
