//! Locating marker files in an extracted source tree
//!
//! A GitHub source tarball extracts to a single `<repo>-<ref>` folder;
//! installer marker files live directly inside it.

use crate::error::{RezupError, RezupResult};
use std::path::{Path, PathBuf};

/// Find the single top-level subdirectory the archive produced.
fn top_level_dir(root: &Path) -> RezupResult<Option<PathBuf>> {
    let entries = std::fs::read_dir(root)
        .map_err(|e| RezupError::io(format!("reading {}", root.display()), e))?;

    for entry in entries {
        let entry =
            entry.map_err(|e| RezupError::io(format!("reading {}", root.display()), e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| RezupError::io(format!("inspecting {}", entry.path().display()), e))?;
        if file_type.is_dir() {
            return Ok(Some(entry.path()));
        }
    }

    Ok(None)
}

/// Locate `file_name` directly under the archive's top-level folder.
///
/// Returns the distinguished `MissingFile` error when either the folder
/// or the file is absent; the strategy resolver intercepts exactly that
/// error to fall through to its next candidate. Any other enumeration
/// failure propagates as a generic fatal error.
pub fn repo_root_file(root: &Path, file_name: &str) -> RezupResult<PathBuf> {
    let missing = || RezupError::MissingFile {
        pattern: format!("{}/*/{}", root.display(), file_name),
    };

    let Some(subdir) = top_level_dir(root)? else {
        return Err(missing());
    };

    let candidate = subdir.join(file_name);
    match std::fs::metadata(&candidate) {
        Ok(meta) if meta.is_file() => Ok(candidate),
        Ok(_) => Err(missing()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(missing()),
        Err(e) => Err(RezupError::io(
            format!("probing {}", candidate.display()),
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finds_file_under_single_subdir() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("rez-1.0");
        std::fs::create_dir(&subdir).unwrap();
        std::fs::write(subdir.join("install.py"), "").unwrap();

        let found = repo_root_file(temp.path(), "install.py").unwrap();
        assert_eq!(found, subdir.join("install.py"));
    }

    #[test]
    fn missing_file_is_distinguished() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("rez-1.0")).unwrap();

        let err = repo_root_file(temp.path(), "install.py").unwrap_err();
        assert!(err.is_missing_file());
        assert!(err.to_string().contains("*/install.py"));
    }

    #[test]
    fn missing_subdir_is_distinguished() {
        let temp = TempDir::new().unwrap();
        // A stray top-level file is not the expected subdirectory
        std::fs::write(temp.path().join("README"), "").unwrap();

        let err = repo_root_file(temp.path(), "install.py").unwrap_err();
        assert!(err.is_missing_file());
    }

    #[test]
    fn directory_named_like_marker_does_not_match() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("rez-1.0");
        std::fs::create_dir_all(subdir.join("install.py")).unwrap();

        let err = repo_root_file(temp.path(), "install.py").unwrap_err();
        assert!(err.is_missing_file());
    }

    #[test]
    fn unreadable_root_is_generic_error() {
        let err = repo_root_file(Path::new("/nonexistent/rezup-test"), "install.py").unwrap_err();
        assert!(!err.is_missing_file());
    }
}
