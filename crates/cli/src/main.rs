//! Model Context Premium CLI - vector store search and tool management.
//!
//! # Usage
//!
//! ```bash
//! # Search a vector store directly
//! mcp-premium vs search vs_abc123 "refund policy" --limit 5
//!
//! # Restrict the search with attribute filters
//! mcp-premium vs search vs_abc123 "refund policy" --filters '{"lang": ["en"]}'
//!
//! # Persist the OpenAI API key
//! mcp-premium settings set-api-key sk-...
//!
//! # Run the gated tool as a given user
//! mcp-premium tool invoke "refund policy" --user 7 --role customer
//! ```
//!
//! # Commands
//!
//! - `vs search` - Search an `OpenAI` vector store
//! - `settings` - Show or change persisted settings
//! - `tool` - Describe or invoke the `search_private_data` tool
//!
//! Set `MCP_LOG_FORMAT=json` for structured log output.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use mcp_premium_core::DEFAULT_LIMIT;
use mcp_premium_tool::PremiumConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "mcp-premium")]
#[command(author, version, about = "Model Context Premium CLI tools")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with `OpenAI` vector stores
    Vs {
        #[command(subcommand)]
        action: VsAction,
    },
    /// Manage persisted settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Inspect or run the `search_private_data` tool
    Tool {
        #[command(subcommand)]
        action: ToolAction,
    },
}

#[derive(Subcommand)]
enum VsAction {
    /// Search a vector store
    Search {
        /// Vector store ID
        store_id: String,

        /// Search query
        query: String,

        /// Attribute filters as a JSON object of string arrays
        #[arg(long)]
        filters: Option<String>,

        /// Maximum number of results (1-100)
        #[arg(long, default_value_t = DEFAULT_LIMIT, allow_negative_numbers = true)]
        limit: i64,

        /// `OpenAI` API key, overriding configured keys
        #[arg(long = "api_key", alias = "api-key")]
        api_key: Option<String>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Store the `OpenAI` API key
    SetApiKey {
        /// The API key
        key: String,
    },
    /// Print the settings (API key redacted)
    Show,
}

#[derive(Subcommand)]
enum ToolAction {
    /// Print the tool registration record as JSON
    Describe,
    /// Run the tool and print its JSON response
    Invoke {
        /// Search query
        query: String,

        /// Caller user ID (anonymous if omitted)
        #[arg(short, long)]
        user: Option<String>,

        /// Caller role, repeatable (`customer`, `editor`, `administrator`, ...)
        #[arg(short, long = "role")]
        roles: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env first so RUST_LOG from it applies
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli).await {
        tracing::debug!(error = ?e, "command failed");
        #[allow(clippy::print_stderr)]
        {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = if debug {
        EnvFilter::new("mcp_premium=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "mcp_premium=info".into())
    };

    let is_json = std::env::var("MCP_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let config = PremiumConfig::from_env()?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Vs { action } => match action {
            VsAction::Search {
                store_id,
                query,
                filters,
                limit,
                api_key,
            } => {
                let args = commands::vector_store::SearchArgs {
                    store_id,
                    query,
                    filters,
                    limit,
                    api_key,
                };
                commands::vector_store::search(&config, args).await?;
            }
        },
        Commands::Settings { action } => match action {
            SettingsAction::SetApiKey { key } => commands::settings::set_api_key(&config, &key)?,
            SettingsAction::Show => commands::settings::show(&config)?,
        },
        Commands::Tool { action } => match action {
            ToolAction::Describe => commands::tool::describe()?,
            ToolAction::Invoke { query, user, roles } => {
                commands::tool::invoke(&config, &query, user.as_deref(), &roles).await?;
            }
        },
    }
    Ok(())
}
