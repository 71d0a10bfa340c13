//! Error types for rezup
//!
//! All modules use `RezupResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rezup operations
pub type RezupResult<T> = Result<T, RezupError>;

/// All errors that can occur in rezup
#[derive(Error, Debug)]
pub enum RezupError {
    // Probe errors
    //
    // MissingFile is the one condition callers recover from: the
    // strategy resolver intercepts it to fall through to its next
    // candidate installer. Everything else aborts the pipeline.
    #[error("Could not find {pattern}")]
    MissingFile { pattern: String },

    #[error("No installer found under {root}: expected install.py or setup.py in the archive's top-level folder")]
    NoInstaller { root: PathBuf },

    // Fetch errors
    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Download of {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to extract archive into {dest}: {reason}")]
    Extract { dest: PathBuf, reason: String },

    // Manifest errors
    #[error("Invalid install manifest at {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    // Process errors
    #[error("Command failed to start: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command exited with status {code}: {command}")]
    CommandExit { command: String, code: i32 },

    #[error("Empty install command")]
    EmptyCommand,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl RezupError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Whether this is the distinguished missing-marker-file condition
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::MissingFile { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Download { .. } => Some("Check network access and that the repository exists"),
            Self::HttpStatus { .. } => {
                Some("Check that the repository and ref exist; refs are used in the URL as-is")
            }
            Self::NoInstaller { .. } => {
                Some("Point --ref at a revision that ships install.py or setup.py")
            }
            Self::CommandFailed { .. } => {
                Some("Ensure python and pip are installed and on your PATH")
            }
            _ => None,
        }
    }
}
