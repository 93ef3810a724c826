//! Error types for resetacl
//!
//! - `WalkError`: failures raised by the tree walker itself
//! - `SecurityError`: privilege and ownership/permission failures
//! - `Error`: top-level error for the CLI, wrapping both

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced by the walker.
#[derive(Error, Debug)]
pub enum WalkError {
    /// The base path does not exist
    #[error("File or Directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The base path exists but cannot be listed as a directory
    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Listing a directory failed (deleted, permission revoked, ...)
    #[error("Failed to read directory '{}': {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    pub(crate) fn read_dir(path: &Path, source: io::Error) -> Self {
        Self::ReadDir {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The path this error occurred at.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } | Self::NotADirectory { path } | Self::ReadDir { path, .. } => {
                path
            }
        }
    }

    /// Whether a skip-and-continue walk may step over this error.
    ///
    /// Only per-directory listing failures qualify; a bad base path always ends the walk.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ReadDir { .. })
    }
}

/// Errors produced by privilege checks and security resets.
#[derive(Error, Debug)]
pub enum SecurityError {
    /// Privilege name is not one we know how to map
    #[error("Unknown privilege '{name}'")]
    UnknownPrivilege { name: String },

    /// The process does not hold the privilege
    #[error("Privilege not held: {name}")]
    PrivilegeNotHeld { name: String },

    /// Security resets are not implemented on this platform
    #[error("Security reset is not supported on this platform")]
    Unsupported,

    /// Changing ownership or permissions of a node failed
    #[error("Failed to reset security of '{}': {source}", path.display())]
    Apply {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the process credentials failed
    #[error("Failed to query process privileges: {source}")]
    Query {
        #[source]
        source: io::Error,
    },
}

/// Top-level error type for the resetacl application
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    /// I/O errors writing output
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Error
pub type Result<T> = std::result::Result<T, Error>;
