//! Slip Desk - review, stake and place a batch of betting slips
//!
//! Slips are fetched once per run from the placement API (or a local JSON
//! file). Nothing is sent back: placing a slip only removes it from the
//! working set.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

// Use the library crate
use slipdesk::cli::commands::{self, ListOptions};
use slipdesk::config::Config;

/// Slip Desk - betting slip review console
#[derive(Parser)]
#[command(name = "slipdesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "slipdesk.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of slips
    List {
        /// Master slip id, dashboard URL with ?masterSlipId=, or a JSON file with --file
        source: String,

        /// Treat SOURCE as a local JSON file
        #[arg(long)]
        file: bool,

        /// Match slip id or team names (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Risk filter: all, low, medium, high
        #[arg(short, long)]
        risk: Option<String>,

        /// Sort key: confidence, odds, stake, risk, return
        #[arg(long)]
        sort: Option<String>,

        /// Page number (1-based)
        #[arg(short, long)]
        page: Option<usize>,

        /// Rows per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Distribute a bankroll across one risk bucket
    Distribute {
        /// Master slip id, dashboard URL with ?masterSlipId=, or a JSON file with --file
        source: String,

        /// Risk bucket: low, medium, high
        #[arg(short, long)]
        risk: String,

        /// Amount to distribute
        #[arg(short, long)]
        bankroll: String,

        /// Treat SOURCE as a local JSON file
        #[arg(long)]
        file: bool,
    },

    /// Review slips interactively
    Review {
        /// Master slip id, dashboard URL with ?masterSlipId=, or a JSON file with --file
        source: String,

        /// Treat SOURCE as a local JSON file
        #[arg(long)]
        file: bool,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration; logging format depends on it
    let config = Config::load(&cli.config);
    let json_logs = config.as_ref().map(|c| c.logging.json).unwrap_or(false);
    init_tracing(json_logs)?;

    let config = match config {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::List {
            source,
            file,
            search,
            risk,
            sort,
            page,
            page_size,
        } => {
            let options = ListOptions {
                search,
                risk,
                sort,
                page,
                page_size,
            };
            commands::list(&config, &source, file, options).await
        }
        Commands::Distribute {
            source,
            risk,
            bankroll,
            file,
        } => commands::distribute(&config, &source, file, &risk, &bankroll).await,
        Commands::Review { source, file } => commands::review(&config, &source, file).await,
        Commands::Config => commands::show_config(&config),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing. Logs go to stderr so they stay out of rendered tables.
fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("slipdesk=info".parse()?);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .init();
    }
    Ok(())
}
