//! Error types for artifact store operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing artifacts.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read from file system.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write to file system.
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove a file.
    #[error("failed to remove {path}: {source}")]
    RemoveError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to (de)serialize a registration.
    #[error("failed to serialize: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Failed to create directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Program name cannot be used as a file name.
    #[error("invalid program name: '{0}'")]
    InvalidName(String),
}

/// Result type alias for artifact store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
