//! Environment composition
//!
//! The pipeline never touches the process environment while it runs; it
//! composes an ordered list of actions from a manifest and a snapshot
//! of the current environment, and applies them once at the outer
//! boundary - to the current process, and to the surrounding CI job's
//! env/path files when present so later steps observe the same paths.

use crate::error::{RezupError, RezupResult};
use crate::manifest::InstallManifest;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The search-path variable. Handled via the dedicated prepend
/// mechanism, never exported wholesale.
pub const PATH_VAR: &str = "PATH";

/// Platform path-list delimiter
#[cfg(windows)]
pub const LIST_DELIMITER: &str = ";";
#[cfg(not(windows))]
pub const LIST_DELIMITER: &str = ":";

/// One environment mutation, in application order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvAction {
    /// Prepend one directory to the executable search path
    PrependPath(String),

    /// Export `name` with a fully merged value
    Export { name: String, value: String },
}

/// Snapshot of the current process environment
pub fn snapshot() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Build the actions a manifest implies against an environment snapshot.
///
/// `PATH` entries become prepend actions and never produce an exported
/// `PATH`. Every other variable merges its existing value, split on the
/// platform delimiter, with the manifest's paths appended after it -
/// existing entries are preserved, never replaced. Variables are
/// visited in manifest insertion order.
pub fn compose(manifest: &InstallManifest, current: &HashMap<String, String>) -> Vec<EnvAction> {
    let mut actions = Vec::new();

    for (var, paths) in manifest.iter() {
        if var == PATH_VAR {
            actions.extend(paths.iter().cloned().map(EnvAction::PrependPath));
        } else {
            let mut merged: Vec<String> = current
                .get(var)
                .filter(|value| !value.is_empty())
                .map(|value| value.split(LIST_DELIMITER).map(str::to_string).collect())
                .unwrap_or_default();
            merged.extend(paths.iter().cloned());

            actions.push(EnvAction::Export {
                name: var.clone(),
                value: merged.join(LIST_DELIMITER),
            });
        }
    }

    actions
}

/// Files the CI runner watches for environment updates between steps
#[derive(Debug, Default)]
pub struct RunnerFiles {
    pub env_file: Option<PathBuf>,
    pub path_file: Option<PathBuf>,
}

impl RunnerFiles {
    /// Discover the GitHub Actions env/path files, if any
    pub fn from_env() -> Self {
        Self {
            env_file: std::env::var_os("GITHUB_ENV").map(PathBuf::from),
            path_file: std::env::var_os("GITHUB_PATH").map(PathBuf::from),
        }
    }
}

/// Apply composed actions to the process environment and to the CI
/// runner files. The only place rezup mutates ambient state.
pub fn apply(actions: &[EnvAction], runner: &RunnerFiles) -> RezupResult<()> {
    for action in actions {
        match action {
            EnvAction::PrependPath(dir) => {
                let merged = match std::env::var(PATH_VAR) {
                    Ok(current) if !current.is_empty() => {
                        format!("{}{}{}", dir, LIST_DELIMITER, current)
                    }
                    _ => dir.clone(),
                };
                std::env::set_var(PATH_VAR, &merged);

                if let Some(ref file) = runner.path_file {
                    append_line(file, dir)?;
                }
                debug!("Prepended {} to {}", dir, PATH_VAR);
            }
            EnvAction::Export { name, value } => {
                // Update the in-process copy too, so child processes
                // spawned later in this run inherit it.
                std::env::set_var(name, value);

                if let Some(ref file) = runner.env_file {
                    append_line(file, &format!("{}={}", name, value))?;
                }
                debug!("Exported {}", name);
            }
        }
    }

    Ok(())
}

fn append_line(file: &Path, line: &str) -> RezupResult<()> {
    use std::io::Write;

    let mut handle = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .map_err(|e| RezupError::io(format!("opening {}", file.display()), e))?;

    writeln!(handle, "{}", line)
        .map_err(|e| RezupError::io(format!("appending to {}", file.display()), e))
}
