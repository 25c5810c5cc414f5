//! Error types for flowgraph compilation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while compiling a flowgraph.
#[derive(Error, Debug)]
pub enum CompileError {
    /// Compiler tool not found in PATH.
    #[error("{0} not found in PATH")]
    ToolNotFound(String),

    /// The flowgraph definition could not be parsed.
    #[error("malformed flowgraph: {0}")]
    Malformed(String),

    /// The compiler tool ran but reported failure.
    #[error("compiler exited with {status}: {stderr}")]
    ToolFailed { status: String, stderr: String },

    /// The compiler did not produce the expected output file.
    #[error("compiler output not found at {0}")]
    MissingOutput(PathBuf),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for compile operations.
pub type Result<T> = std::result::Result<T, CompileError>;
