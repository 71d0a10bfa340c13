//! Rezup - install and cache the rez package manager
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use rezup::cli::{Cli, Commands};
use rezup::config::ConfigManager;
use rezup::error::RezupResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            // Surface the failure to the Actions log annotation channel
            if std::env::var_os("GITHUB_ACTIONS").is_some() {
                println!("::error::{}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> RezupResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn (spinners only), 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("rezup=warn"),
        1 => EnvFilter::new("rezup=info"),
        _ => EnvFilter::new("rezup=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Load configuration
    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    // Dispatch to command
    match cli.command {
        Commands::Install(args) => {
            rezup::cli::commands::install::execute(args, &config, cli.cache_dir).await
        }
        Commands::Cache(args) => {
            rezup::cli::commands::cache::execute(args, &config, cli.cache_dir).await
        }
    }
}
