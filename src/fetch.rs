//! Source archive download and extraction
//!
//! Archives come from the code host's source-archive endpoint as
//! gzipped tarballs and are unpacked into a fresh staging directory.
//! Failures are fatal and never retried; partially written staging
//! directories are left for the host temp lifecycle to reap.

use crate::error::{RezupError, RezupResult};
use crate::store::InstallKey;
use crate::ui::TaskSpinner;
use async_trait::async_trait;
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Default code-hosting address archives are fetched from
pub const DEFAULT_HOST: &str = "github.com";

/// Source-archive URL for a repository at a ref
pub fn archive_url(key: &InstallKey, host: &str) -> String {
    format!(
        "https://{}/{}/archive/{}.tar.gz",
        host, key.repo, key.git_ref
    )
}

/// Narrow seam over the downloader/extractor
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    /// Download the archive at `url` and extract it, returning the
    /// extraction root.
    async fn fetch(&self, url: &str) -> RezupResult<PathBuf>;
}

/// Fetches archives over HTTPS into a staging area
pub struct HttpArchiveSource {
    staging_root: PathBuf,
}

impl HttpArchiveSource {
    /// `staging_root` is the directory extraction targets are created
    /// under, one fresh subdirectory per fetch.
    pub fn new(staging_root: PathBuf) -> Self {
        Self { staging_root }
    }
}

#[async_trait]
impl ArchiveSource for HttpArchiveSource {
    async fn fetch(&self, url: &str) -> RezupResult<PathBuf> {
        let url = url.to_string();
        let dest = self.staging_root.join(Uuid::new_v4().to_string());

        info!("Downloading {}", url);
        let spinner = TaskSpinner::start(&format!("Downloading {}", url));

        // ureq and tar are blocking; keep them off the async runtime.
        let result = {
            let url = url.clone();
            let dest = dest.clone();
            tokio::task::spawn_blocking(move || download_and_extract(&url, &dest))
                .await
                .map_err(|e| RezupError::io("archive fetch task", std::io::Error::other(e)))?
        };

        match result {
            Ok(root) => {
                spinner.stop(&format!("Downloaded {}", url));
                Ok(root)
            }
            Err(e) => {
                spinner.clear();
                Err(e)
            }
        }
    }
}

fn download_and_extract(url: &str, dest: &Path) -> RezupResult<PathBuf> {
    std::fs::create_dir_all(dest)
        .map_err(|e| RezupError::io(format!("creating staging directory {}", dest.display()), e))?;

    let mut response = ureq::get(url).call().map_err(|e| match e {
        ureq::Error::StatusCode(code) => RezupError::HttpStatus {
            url: url.to_string(),
            status: code,
        },
        other => RezupError::Download {
            url: url.to_string(),
            reason: other.to_string(),
        },
    })?;

    extract_tar_gz(response.body_mut().as_reader(), dest)?;
    debug!("Extracted {} into {}", url, dest.display());

    Ok(dest.to_path_buf())
}

/// Unpack a gzipped tarball from `reader` into `dest`
pub(crate) fn extract_tar_gz(reader: impl Read, dest: &Path) -> RezupResult<()> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    archive.unpack(dest).map_err(|e| RezupError::Extract {
        dest: dest.to_path_buf(),
        reason: e.to_string(),
    })
}
