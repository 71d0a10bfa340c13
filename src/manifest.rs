//! Install manifest persisted alongside a cached install
//!
//! `setup.json` at the root of a cache entry maps environment variable
//! names to the ordered paths that install contributes. It is written
//! once per successful install, before the entry reaches the store, so
//! the cached copy is self-describing; later cache hits read it instead
//! of recomputing the layout.

use crate::error::{RezupError, RezupResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Manifest file name at the root of a cache entry
pub const MANIFEST_FILE: &str = "setup.json";

/// Environment variable names mapped to ordered path lists.
///
/// Iteration preserves insertion order; within one variable's list,
/// paths listed first take precedence where the consuming tool treats
/// the variable as ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallManifest {
    paths: IndexMap<String, Vec<String>>,
}

impl InstallManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path to a variable's list, creating the variable entry
    /// if this is its first path.
    pub fn push(&mut self, var: impl Into<String>, path: impl Into<String>) {
        self.paths.entry(var.into()).or_default().push(path.into());
    }

    pub fn get(&self, var: &str) -> Option<&Vec<String>> {
        self.paths.get(var)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.paths.iter()
    }

    /// Path of the manifest file within an install directory
    pub fn file_path(install_dir: &Path) -> PathBuf {
        install_dir.join(MANIFEST_FILE)
    }

    /// Read the manifest of an install directory.
    ///
    /// A missing file is `Ok(None)` - older cache entries have no
    /// manifest and the caller infers the layout instead. Any other
    /// read failure, and malformed JSON, are fatal.
    pub async fn load(install_dir: &Path) -> RezupResult<Option<Self>> {
        let path = Self::file_path(install_dir);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RezupError::io(
                    format!("reading manifest {}", path.display()),
                    e,
                ))
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| RezupError::ManifestInvalid {
                path,
                reason: e.to_string(),
            })
    }

    /// Write the manifest into an install directory. Manifests are
    /// immutable once written; this runs exactly once per install.
    pub async fn write(&self, install_dir: &Path) -> RezupResult<()> {
        let path = Self::file_path(install_dir);
        let content = serde_json::to_string(self)?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| RezupError::io(format!("writing manifest {}", path.display()), e))
    }
}
