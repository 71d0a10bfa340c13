//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Rezup - install and cache rez from a source archive
///
/// Resolves a (repository, ref) pair to a cached rez install, fetching
/// and installing on a miss, and exposes the resulting paths to the
/// environment and the surrounding CI job.
#[derive(Parser, Debug)]
#[command(name = "rezup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "REZUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Install store root (defaults to the user cache directory)
    #[arg(long, global = true, env = "REZUP_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install rez (or reuse the cached install) and expose its paths
    Install(InstallArgs),

    /// Manage the install store
    Cache(CacheArgs),
}

/// Arguments for the install command
///
/// Each option falls back to the `INPUT_*` variable the GitHub Actions
/// runner sets for action inputs, so `rezup install` works as a step
/// with `with:` values and no flags.
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Repository to install from, as owner/name
    #[arg(long, env = "INPUT_SOURCE")]
    pub source: String,

    /// Git ref to install: branch, tag, or commit
    #[arg(long = "ref", env = "INPUT_REF")]
    pub git_ref: String,

    /// Create all configured packages paths after install
    #[arg(long)]
    pub make_packages_paths: bool,

    /// Comma-separated package names to `rez bind` after install
    #[arg(long, env = "INPUT_BINDS", default_value = "")]
    pub binds: String,
}

impl InstallArgs {
    /// Whether packages paths should be created.
    ///
    /// The Actions runner exposes the input as a plain string; any
    /// non-empty value except "false"/"0" counts as set, which is
    /// looser than clap's boolean parser allows.
    pub fn wants_packages_paths(&self) -> bool {
        if self.make_packages_paths {
            return true;
        }
        match std::env::var("INPUT_MAKEPACKAGESPATHS") {
            Ok(value) => {
                let value = value.trim();
                !value.is_empty() && value != "false" && value != "0"
            }
            Err(_) => false,
        }
    }
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List cached installs
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove all cached installs
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Output format for list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
