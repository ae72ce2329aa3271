//! Error types for filecopy
//!
//! Every copy primitive returns a single [`CopyError`] carrying the paths
//! and sizes needed to diagnose the failure.

use std::fs::Metadata;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for copy operations
#[derive(Error, Debug)]
pub enum CopyError {
    /// Source and destination denote the same underlying file
    #[error("'{src}' and '{dst}' are the same file")]
    SameFile {
        /// Source path as given by the caller
        src: PathBuf,
        /// Destination path as given by the caller
        dst: PathBuf,
    },

    /// Entry is a named pipe and cannot be copied as a byte stream
    #[error("'{path}' is a named pipe")]
    SpecialFile {
        /// Offending path
        path: PathBuf,
        /// Metadata snapshot taken when the pipe was detected
        metadata: Metadata,
    },

    /// Bytes transferred differ from the size reported before the copy
    #[error("{path}: {copied}/{expected} bytes copied")]
    SizeMismatch {
        /// Source path whose size was used as the expectation
        path: PathBuf,
        /// Bytes actually transferred
        copied: u64,
        /// Size recorded from the source metadata
        expected: u64,
    },

    /// Path has no final component to place inside a directory
    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),

    /// Invalid option value
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Underlying OS error, kept verbatim
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// Path the failing call operated on
        path: PathBuf,
        /// OS error as returned
        #[source]
        source: std::io::Error,
    },
}

impl CopyError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error is the OS reporting a missing entry
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }

    /// Check if this error is a permission issue
    pub fn is_permission_error(&self) -> bool {
        match self {
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }

    /// Underlying OS error, if any
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::SameFile { src: path, .. }
            | Self::SpecialFile { path, .. }
            | Self::SizeMismatch { path, .. }
            | Self::InvalidPath(path)
            | Self::Io { path, .. } => Some(path),
            Self::ConfigError(_) => None,
        }
    }
}

/// Result type alias for copy operations
pub type Result<T> = std::result::Result<T, CopyError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| CopyError::io(path, e))
    }
}
