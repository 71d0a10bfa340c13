//! Installation strategy resolution
//!
//! An extracted rez source tree installs one of two mutually exclusive
//! ways: via its own `install.py` (preferred), or as a plain Python
//! package via `setup.py` and `pip install --target`.

use crate::env::PATH_VAR;
use crate::error::{RezupError, RezupResult};
use crate::manifest::InstallManifest;
use crate::probe::repo_root_file;
use std::path::{Path, PathBuf};

/// Executable name the direct installer places under the bin folder
const REZ_BIN: &str = "rez";

/// Module-search-path variable the package install contributes to
const PYTHONPATH_VAR: &str = "PYTHONPATH";

/// Target platform, as far as the install layout cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Posix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Folder executables land in under an install root. The only
    /// platform-conditional behavior in the pipeline.
    pub fn bin_folder(self) -> &'static str {
        match self {
            Self::Windows => "Scripts",
            Self::Posix => "bin",
        }
    }
}

/// One of the two ways an extracted tree can be installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStrategy {
    /// rez's own `install.py`, run with the extraction root as destination
    DirectInstaller { script: PathBuf },

    /// `pip install --target` of the package rooted at setup.py's folder
    PackageInstall { package_dir: PathBuf },
}

impl InstallStrategy {
    /// Detect which strategy applies to an extracted tree.
    ///
    /// `install.py` always wins over `setup.py`, even when both marker
    /// files are present; only the distinguished missing-file condition
    /// falls through to the next candidate. Neither marker present is
    /// fatal, with no further fallback.
    pub fn detect(root: &Path) -> RezupResult<Self> {
        match repo_root_file(root, "install.py") {
            Ok(script) => return Ok(Self::DirectInstaller { script }),
            Err(e) if e.is_missing_file() => {}
            Err(e) => return Err(e),
        }

        match repo_root_file(root, "setup.py") {
            Ok(setup) => {
                let package_dir = setup
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                Ok(Self::PackageInstall { package_dir })
            }
            Err(e) if e.is_missing_file() => Err(RezupError::NoInstaller {
                root: root.to_path_buf(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Build the install command, targeting `root` as the destination.
    pub fn command(&self, root: &Path) -> Vec<String> {
        match self {
            Self::DirectInstaller { script } => vec![
                "python".to_string(),
                script.display().to_string(),
                root.display().to_string(),
            ],
            Self::PackageInstall { package_dir } => vec![
                "pip".to_string(),
                "install".to_string(),
                "--target".to_string(),
                root.display().to_string(),
                package_dir.display().to_string(),
            ],
        }
    }

    /// Environment path contributions of an install of this shape
    /// rooted at `install_dir`.
    pub fn env_paths(&self, install_dir: &Path, platform: Platform) -> InstallManifest {
        let mut manifest = InstallManifest::new();
        let bin = install_dir.join(platform.bin_folder());

        match self {
            Self::DirectInstaller { .. } => {
                manifest.push(PATH_VAR, bin.join(REZ_BIN).display().to_string());
            }
            Self::PackageInstall { .. } => {
                manifest.push(PATH_VAR, bin.display().to_string());
                manifest.push(PYTHONPATH_VAR, install_dir.display().to_string());
            }
        }

        manifest
    }

    /// Short human-readable name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            Self::DirectInstaller { .. } => "install.py",
            Self::PackageInstall { .. } => "pip install",
        }
    }
}

/// Infer the path contributions of an already-installed directory from
/// its layout, for cache entries that predate the manifest file.
pub fn infer_env_paths(install_dir: &Path, platform: Platform) -> InstallManifest {
    let bin = install_dir.join(platform.bin_folder());
    let mut manifest = InstallManifest::new();

    if bin.join(REZ_BIN).is_file() {
        // Direct-installer shape: a rez launcher under bin/
        manifest.push(PATH_VAR, bin.join(REZ_BIN).display().to_string());
    } else {
        // Package shape: scripts under bin/, modules at the root
        manifest.push(PATH_VAR, bin.display().to_string());
        manifest.push(PYTHONPATH_VAR, install_dir.display().to_string());
    }

    manifest
}
