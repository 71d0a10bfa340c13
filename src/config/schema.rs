//! Configuration schema

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Install settings
    pub install: InstallConfig,

    /// Install store settings
    pub cache: CacheConfig,
}

/// `[install]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Code-hosting address archives are fetched from. The public
    /// default works for github.com repositories; point this at an
    /// enterprise host to use its archive endpoint instead.
    pub host: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            host: crate::fetch::DEFAULT_HOST.to_string(),
        }
    }
}

/// `[cache]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Override for the install store root
    pub dir: Option<PathBuf>,
}
