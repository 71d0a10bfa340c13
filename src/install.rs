//! The install pipeline
//!
//! Ordering is strict: cache lookup, then on a miss fetch, resolve,
//! execute, store. Every step is fallible and the first failure aborts
//! the rest; nothing reaches the store unless the install fully
//! succeeded. A cache hit skips straight to the manifest.

use crate::error::RezupResult;
use crate::exec::CommandRunner;
use crate::fetch::{self, ArchiveSource};
use crate::manifest::InstallManifest;
use crate::store::{InstallKey, ToolStore};
use crate::strategy::{infer_env_paths, InstallStrategy, Platform};
use tracing::{debug, info};

/// Resolve `key` to a usable install and return its path manifest.
pub async fn install_tool(
    key: &InstallKey,
    store: &ToolStore,
    source: &dyn ArchiveSource,
    runner: &dyn CommandRunner,
    platform: Platform,
    host: &str,
) -> RezupResult<InstallManifest> {
    if let Some(cached) = store.lookup(key) {
        info!("Cache hit for {}@{}", key.repo, key.git_ref);

        if let Some(manifest) = InstallManifest::load(&cached).await? {
            return Ok(manifest);
        }

        // Entry predates manifests; infer the layout it provides and
        // leave the entry untouched.
        debug!("No manifest at {}, inferring layout", cached.display());
        return Ok(infer_env_paths(&cached, platform));
    }

    let url = fetch::archive_url(key, host);
    let tree = source.fetch(&url).await?;

    let strategy = InstallStrategy::detect(&tree)?;
    info!("Installing via {}", strategy.name());
    runner.run(&strategy.command(&tree)).await?;

    // Manifest paths refer to the final cached location, decided before
    // the move, so the stored copy is self-describing.
    let entry = store.entry_path(key);
    let manifest = strategy.env_paths(&entry, platform);
    manifest.write(&tree).await?;
    store.store(key, &tree).await?;
    debug!("Cached install at {}", entry.display());

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RezupError;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serves a pre-built extracted tree, counting fetches
    struct FakeSource {
        tree: PathBuf,
        fetched: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn new(tree: PathBuf) -> Self {
            Self {
                tree,
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetched.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ArchiveSource for FakeSource {
        async fn fetch(&self, url: &str) -> RezupResult<PathBuf> {
            self.fetched.lock().unwrap().push(url.to_string());
            Ok(self.tree.clone())
        }
    }

    #[derive(Default)]
    struct FakeRunner {
        runs: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(&self, command: &[String]) -> RezupResult<()> {
            self.runs.lock().unwrap().push(command.to_vec());
            if self.fail {
                return Err(RezupError::CommandExit {
                    command: command.join(" "),
                    code: 1,
                });
            }
            Ok(())
        }

        async fn run_captured(&self, command: &[String]) -> RezupResult<String> {
            self.runs.lock().unwrap().push(command.to_vec());
            Ok(String::new())
        }
    }

    fn make_tree(parent: &Path, marker: &str) -> PathBuf {
        let tree = parent.join("extracted");
        std::fs::create_dir_all(tree.join("rez-1.0")).unwrap();
        std::fs::write(tree.join("rez-1.0").join(marker), "").unwrap();
        tree
    }

    #[tokio::test]
    async fn first_install_fetches_resolves_executes_stores() {
        let temp = TempDir::new().unwrap();
        let store = ToolStore::new(temp.path().join("store"));
        let source = FakeSource::new(make_tree(temp.path(), "install.py"));
        let runner = FakeRunner::default();
        let key = InstallKey::new("acme/tool", "v1.0");

        let manifest = install_tool(
            &key,
            &store,
            &source,
            &runner,
            Platform::Posix,
            "github.com",
        )
        .await
        .unwrap();

        assert_eq!(source.fetch_count(), 1);
        assert_eq!(
            source.fetched.lock().unwrap()[0],
            "https://github.com/acme/tool/archive/v1.0.tar.gz"
        );
        assert_eq!(runner.runs.lock().unwrap().len(), 1);

        let entry = store.entry_path(&key);
        assert!(entry.is_dir());
        assert_eq!(
            manifest.get("PATH").unwrap(),
            &vec![entry.join("bin").join("rez").display().to_string()]
        );

        // Stored copy is self-describing
        let stored = InstallManifest::load(&entry).await.unwrap().unwrap();
        assert_eq!(stored, manifest);
    }

    #[tokio::test]
    async fn second_run_hits_cache_with_zero_fetches() {
        let temp = TempDir::new().unwrap();
        let store = ToolStore::new(temp.path().join("store"));
        let key = InstallKey::new("acme/tool", "v1.0");

        let first_source = FakeSource::new(make_tree(temp.path(), "install.py"));
        let first = install_tool(
            &key,
            &store,
            &first_source,
            &FakeRunner::default(),
            Platform::Posix,
            "github.com",
        )
        .await
        .unwrap();

        let second_source = FakeSource::new(PathBuf::from("/nonexistent"));
        let second_runner = FakeRunner::default();
        let second = install_tool(
            &key,
            &store,
            &second_source,
            &second_runner,
            Platform::Posix,
            "github.com",
        )
        .await
        .unwrap();

        assert_eq!(second_source.fetch_count(), 0);
        assert!(second_runner.runs.lock().unwrap().is_empty());
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn no_installer_fails_without_executing_or_storing() {
        let temp = TempDir::new().unwrap();
        let store = ToolStore::new(temp.path().join("store"));
        let source = FakeSource::new(make_tree(temp.path(), "README.md"));
        let runner = FakeRunner::default();
        let key = InstallKey::new("acme/tool", "v1.0");

        let result = install_tool(
            &key,
            &store,
            &source,
            &runner,
            Platform::Posix,
            "github.com",
        )
        .await;

        assert!(matches!(result, Err(RezupError::NoInstaller { .. })));
        assert!(runner.runs.lock().unwrap().is_empty());
        assert!(store.lookup(&key).is_none());
    }

    #[tokio::test]
    async fn failed_install_is_not_cached() {
        let temp = TempDir::new().unwrap();
        let store = ToolStore::new(temp.path().join("store"));
        let source = FakeSource::new(make_tree(temp.path(), "install.py"));
        let runner = FakeRunner {
            fail: true,
            ..Default::default()
        };
        let key = InstallKey::new("acme/tool", "v1.0");

        let result = install_tool(
            &key,
            &store,
            &source,
            &runner,
            Platform::Posix,
            "github.com",
        )
        .await;

        assert!(matches!(result, Err(RezupError::CommandExit { .. })));
        assert!(store.lookup(&key).is_none());
    }

    #[tokio::test]
    async fn hit_without_manifest_infers_layout() {
        let temp = TempDir::new().unwrap();
        let store = ToolStore::new(temp.path().join("store"));
        let key = InstallKey::new("acme/tool", "v1.0");

        // A pre-manifest cache entry with a direct-installer layout
        let entry = store.entry_path(&key);
        std::fs::create_dir_all(entry.join("bin")).unwrap();
        std::fs::write(entry.join("bin").join("rez"), "").unwrap();

        let source = FakeSource::new(PathBuf::from("/nonexistent"));
        let manifest = install_tool(
            &key,
            &store,
            &source,
            &FakeRunner::default(),
            Platform::Posix,
            "github.com",
        )
        .await
        .unwrap();

        assert_eq!(source.fetch_count(), 0);
        assert_eq!(
            manifest.get("PATH").unwrap(),
            &vec![entry.join("bin").join("rez").display().to_string()]
        );
        // Entry stays manifest-less; it is never rewritten
        assert!(InstallManifest::load(&entry).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn package_install_manifest_has_pythonpath() {
        let temp = TempDir::new().unwrap();
        let store = ToolStore::new(temp.path().join("store"));
        let source = FakeSource::new(make_tree(temp.path(), "setup.py"));
        let key = InstallKey::new("acme/tool", "v2.0");

        let manifest = install_tool(
            &key,
            &store,
            &source,
            &FakeRunner::default(),
            Platform::Posix,
            "github.com",
        )
        .await
        .unwrap();

        let entry = store.entry_path(&key);
        assert_eq!(
            manifest.get("PATH").unwrap(),
            &vec![entry.join("bin").display().to_string()]
        );
        assert_eq!(
            manifest.get("PYTHONPATH").unwrap(),
            &vec![entry.display().to_string()]
        );
    }
}
