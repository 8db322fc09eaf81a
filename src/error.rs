//! Error types for packager-fetch
//!
//! All modules use `FetchResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for packager-fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// All errors that can occur while acquiring the packager bundle
#[derive(Error, Debug)]
pub enum FetchError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid packager metadata at {path}: {reason}")]
    MetadataInvalid { path: PathBuf, reason: String },

    // Local build errors
    #[error("Packager {step} failed with exit code {code}")]
    CommandStatus { step: String, code: i32 },

    #[error("Packager {step} terminated by signal")]
    CommandSignaled { step: String },

    #[error("Expected packager output at {} but it does not exist", .0.display())]
    MissingOutput(PathBuf),

    // Remote errors
    #[error("Download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("Hash mismatch: expected {expected} but found {actual}")]
    HashMismatch { expected: String, actual: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FetchError {
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

    /// Create a download error
    pub fn download(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Download {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error is an integrity failure rather than an I/O or network one
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::HashMismatch { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::HashMismatch { .. } => {
                Some("Update the pinned sha256 in packager.json if the release changed")
            }
            Self::Download { .. } => Some("Check your network connection and the packager URL"),
            Self::MetadataInvalid { .. } => {
                Some("packager.json needs string \"src\" and \"sha256\" fields")
            }
            Self::CommandFailed { .. } => Some("Is the package manager installed and on PATH?"),
            _ => None,
        }
    }
}
