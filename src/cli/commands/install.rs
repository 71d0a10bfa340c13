//! Install command - resolve, install, and expose rez

use crate::cli::args::InstallArgs;
use crate::config::Config;
use crate::env::{self, RunnerFiles};
use crate::error::RezupResult;
use crate::exec::ProcessRunner;
use crate::fetch::HttpArchiveSource;
use crate::install::install_tool;
use crate::rez;
use crate::store::{InstallKey, ToolStore};
use crate::strategy::Platform;
use console::style;
use std::path::PathBuf;
use tracing::debug;

/// Execute the install command
pub async fn execute(
    args: InstallArgs,
    config: &Config,
    cache_dir: Option<PathBuf>,
) -> RezupResult<()> {
    let root = cache_dir
        .or_else(|| config.cache.dir.clone())
        .unwrap_or_else(ToolStore::default_root);
    debug!("Using install store at {}", root.display());

    let store = ToolStore::new(root);
    let key = InstallKey::new(args.source.clone(), args.git_ref.clone());
    let source = HttpArchiveSource::new(store.staging_root());
    let runner = ProcessRunner;

    let manifest = install_tool(
        &key,
        &store,
        &source,
        &runner,
        Platform::current(),
        &config.install.host,
    )
    .await?;

    let actions = env::compose(&manifest, &env::snapshot());
    env::apply(&actions, &RunnerFiles::from_env())?;

    if args.wants_packages_paths() {
        rez::make_packages_paths(&runner).await?;
    }

    if !args.binds.trim().is_empty() {
        rez::bind_packages(&runner, &args.binds).await?;
    }

    println!(
        "{} rez ready ({}@{})",
        style("✓").green(),
        args.source,
        args.git_ref
    );

    Ok(())
}
