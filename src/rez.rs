//! Post-install steps driven by the installed rez itself
//!
//! Both steps query `rez config` for directory lists, create the
//! directories idempotently, and (for binds) register named packages
//! one at a time with `rez bind`.

use crate::error::{RezupError, RezupResult};
use crate::exec::CommandRunner;
use tracing::{debug, info};

async fn rez_config(runner: &dyn CommandRunner, key: &str) -> RezupResult<String> {
    runner
        .run_captured(&[
            "rez".to_string(),
            "config".to_string(),
            key.to_string(),
        ])
        .await
}

/// Directories named by a `rez config` listing: one per line, leading
/// `- ` list marker stripped, blank lines skipped. Handles CRLF output.
fn parse_config_paths(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let line = line.strip_prefix("- ").unwrap_or(line);
            (!line.is_empty()).then(|| line.to_string())
        })
        .collect()
}

/// Create every configured packages path (`rez config packages_path`).
/// Already-existing directories are fine.
pub async fn make_packages_paths(runner: &dyn CommandRunner) -> RezupResult<()> {
    let output = rez_config(runner, "packages_path").await?;

    for dir in parse_config_paths(&output) {
        debug!("Creating packages path {}", dir);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| RezupError::io(format!("creating packages path {}", dir), e))?;
    }

    Ok(())
}

/// Create the local packages path, then `rez bind` each comma-separated
/// package name in the given order. The first failing bind aborts the
/// remaining ones.
pub async fn bind_packages(runner: &dyn CommandRunner, binds: &str) -> RezupResult<()> {
    let output = rez_config(runner, "local_packages_path").await?;
    let local = output.trim();
    if !local.is_empty() {
        tokio::fs::create_dir_all(local)
            .await
            .map_err(|e| RezupError::io(format!("creating local packages path {}", local), e))?;
    }

    for package in binds.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        info!("Binding {}", package);
        runner
            .run(&[
                "rez".to_string(),
                "bind".to_string(),
                package.to_string(),
            ])
            .await?;
    }

    Ok(())
}
