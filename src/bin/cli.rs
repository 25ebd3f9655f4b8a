//! CLI binary for nominis.
//!
//! All tracing output goes to stderr so stdout stays clean JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use nominis::{LoadedCredentials, NominisConfig, NominisError, build_query, build_service};
use tracing_subscriber::EnvFilter;

/// Nominis: EUIPO trademark search proxy.
#[derive(Parser)]
#[command(name = "nominis", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, env = "NOMINIS_CONFIG")]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Search trademarks and print the normalised result as JSON.
    Search {
        /// Trademark text to search for.
        text: String,

        /// Keep only marks in this Nice class (repeatable).
        #[arg(long = "class", value_name = "N")]
        classes: Vec<u32>,

        /// Zero-based page index.
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Page size (10–100). Defaults to the configured value.
        #[arg(long)]
        size: Option<u32>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Obtain an access token and print its expiry (never the token).
    Token,

    /// Print the effective configuration as TOML (secrets are omitted).
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nominis=info,nominis_search=info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "nominis failed");
            println!("{}", e.to_payload());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), NominisError> {
    let config = NominisConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Search {
            text,
            classes,
            page,
            size,
            pretty,
        } => {
            let query = build_query(&config, &text, &classes, page, size)?;
            let service = build_service(&config, &LoadedCredentials::from_env())?;
            let result = service.search(&query).await?;
            tracing::info!(
                count = result.records.len(),
                retried = result.retried,
                "search complete"
            );
            let json = if pretty {
                serde_json::to_string_pretty(&result)
            } else {
                serde_json::to_string(&result)
            }?;
            println!("{json}");
        }
        Command::Token => {
            let service = build_service(&config, &LoadedCredentials::from_env())?;
            let credential = service.tokens().acquire().await?;
            println!("{}", serde_json::json!({ "expiresAt": credential.expires_at }));
        }
        Command::Config => {
            config.validate()?;
            let text = toml::to_string_pretty(&config)
                .map_err(|e| NominisError::Config(e.to_string()))?;
            print!("{text}");
        }
    }
    Ok(())
}
