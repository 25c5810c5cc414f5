//! Error types for process supervision.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while starting a program.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Failed to open a child output log.
    #[error("failed to open output log {path}: {source}")]
    Streams {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to spawn the program.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for process operations.
pub type Result<T> = std::result::Result<T, ProcessError>;
