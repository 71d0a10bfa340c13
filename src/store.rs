//! Keyed install store
//!
//! Maps (repository, ref) keys to directories under a local cache root.
//! Entries are created once by a successful install and never mutated
//! afterwards; two racing first-time installs both complete and the
//! last store wins. Nothing here deletes entries except the explicit
//! `clear` used by `rezup cache clear`.

use crate::error::{RezupError, RezupResult};
use std::path::{Path, PathBuf};

/// Identity of one install: an `owner/name` repository plus a git ref
/// (branch, tag, or commit).
///
/// Identical keys resolve to the same cache entry. A ref naming a
/// mutable branch pins whatever the branch pointed at when first
/// installed; that staleness is an accepted limitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallKey {
    pub repo: String,
    pub git_ref: String,
}

impl InstallKey {
    pub fn new(repo: impl Into<String>, git_ref: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            git_ref: git_ref.into(),
        }
    }

    /// Repository owner and name as separate path segments
    fn repo_segments(&self) -> (String, String) {
        match self.repo.split_once('/') {
            Some((owner, name)) => (sanitize(owner), sanitize(name)),
            None => ("_".to_string(), sanitize(&self.repo)),
        }
    }
}

/// Replace path-hostile characters so a key segment maps to exactly one
/// directory name (branch refs like `feature/x` contain separators).
fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Directory-backed install store
pub struct ToolStore {
    root: PathBuf,
}

impl ToolStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Default store root under the user cache directory
    pub fn default_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rezup")
            .join("installs")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Area in-flight downloads and installs are staged in. Lives under
    /// the store root so `store` is a same-filesystem rename in the
    /// common case.
    pub fn staging_root(&self) -> PathBuf {
        self.root.join(".staging")
    }

    /// Deterministic location a key's install lives at once stored
    pub fn entry_path(&self, key: &InstallKey) -> PathBuf {
        let (owner, name) = key.repo_segments();
        self.root.join(owner).join(name).join(sanitize(&key.git_ref))
    }

    /// Look up an existing cached install
    pub fn lookup(&self, key: &InstallKey) -> Option<PathBuf> {
        let path = self.entry_path(key);
        path.is_dir().then_some(path)
    }

    /// Move a completed install into the store under `key`.
    ///
    /// Falls back to a recursive copy when the staging directory is on
    /// another filesystem, leaving the staged copy behind for the host
    /// temp-file lifecycle to reap.
    pub async fn store(&self, key: &InstallKey, dir: &Path) -> RezupResult<PathBuf> {
        let entry = self.entry_path(key);

        if let Some(parent) = entry.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                RezupError::io(format!("creating store path {}", parent.display()), e)
            })?;
        }

        // Replace whatever a racing install stored first; last writer wins.
        if entry.exists() {
            tokio::fs::remove_dir_all(&entry)
                .await
                .map_err(|e| RezupError::io(format!("replacing {}", entry.display()), e))?;
        }

        if tokio::fs::rename(dir, &entry).await.is_err() {
            copy_dir_all(dir, &entry)?;
        }

        Ok(entry)
    }

    /// Enumerate stored installs as (key, path) pairs.
    ///
    /// Keys are reconstructed from the sanitized directory names, which
    /// is lossy for refs that contained separators; good enough for
    /// listing and clearing.
    pub fn entries(&self) -> RezupResult<Vec<(InstallKey, PathBuf)>> {
        let mut entries = Vec::new();

        let owners = match std::fs::read_dir(&self.root) {
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => {
                return Err(RezupError::io(
                    format!("reading store {}", self.root.display()),
                    e,
                ))
            }
        };

        for owner in owners.flatten() {
            if owner.file_name() == ".staging" || !owner.path().is_dir() {
                continue;
            }
            let owner_name = owner.file_name().to_string_lossy().into_owned();

            for repo in std::fs::read_dir(owner.path())
                .map_err(|e| RezupError::io(format!("reading {}", owner.path().display()), e))?
                .flatten()
            {
                if !repo.path().is_dir() {
                    continue;
                }
                let repo_name = repo.file_name().to_string_lossy().into_owned();

                for rf in std::fs::read_dir(repo.path())
                    .map_err(|e| RezupError::io(format!("reading {}", repo.path().display()), e))?
                    .flatten()
                {
                    if !rf.path().is_dir() {
                        continue;
                    }
                    let key = InstallKey::new(
                        format!("{}/{}", owner_name, repo_name),
                        rf.file_name().to_string_lossy().into_owned(),
                    );
                    entries.push((key, rf.path()));
                }
            }
        }

        Ok(entries)
    }

    /// Remove every stored install and the staging area. Returns the
    /// number of installs removed.
    pub async fn clear(&self) -> RezupResult<usize> {
        let entries = self.entries()?;
        let mut removed = 0;

        for (_, path) in &entries {
            tokio::fs::remove_dir_all(path)
                .await
                .map_err(|e| RezupError::io(format!("removing {}", path.display()), e))?;
            removed += 1;
        }

        let staging = self.staging_root();
        if staging.exists() {
            tokio::fs::remove_dir_all(&staging)
                .await
                .map_err(|e| RezupError::io(format!("removing {}", staging.display()), e))?;
        }

        Ok(removed)
    }
}

fn copy_dir_all(src: &Path, dst: &Path) -> RezupResult<()> {
    std::fs::create_dir_all(dst)
        .map_err(|e| RezupError::io(format!("creating {}", dst.display()), e))?;

    let entries = std::fs::read_dir(src)
        .map_err(|e| RezupError::io(format!("reading {}", src.display()), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| RezupError::io(format!("reading {}", src.display()), e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| RezupError::io(format!("inspecting {}", entry.path().display()), e))?;
        let to = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_dir_all(&entry.path(), &to)?;
        } else {
            std::fs::copy(entry.path(), &to)
                .map_err(|e| RezupError::io(format!("copying {}", entry.path().display()), e))?;
        }
    }

    Ok(())
}
