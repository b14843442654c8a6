//! Redline CLI - Compare two image sets and render per-pixel diff images.
//!
//! Redline pairs same-named files across two selections, decodes each pair,
//! and writes a diff image with differing pixels painted opaque red.
//!
//! # Usage
//!
//! ```bash
//! # Compare two directories
//! redline compare ./before ./after
//!
//! # Loosen the per-channel threshold to 10% and pick an output directory
//! redline compare ./before ./after --threshold 10 --out ./diffs
//!
//! # View configuration
//! redline config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Redline - Compare two image sets and render per-pixel diff images.
#[derive(Parser, Debug)]
#[command(name = "redline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare two image sets and export diff images
    Compare(cli::compare::CompareArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match redline_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `redline config path`."
            );
            redline_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Redline v{}", redline_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Compare(args) => cli::compare::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
