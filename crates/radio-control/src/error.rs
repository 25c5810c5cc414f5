//! Error types for remote control operations.

use thiserror::Error;

/// Errors that can occur talking to a program's control endpoint.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Could not reach the control endpoint.
    #[error("failed to connect to {endpoint}: {message}")]
    Connect { endpoint: String, message: String },

    /// The endpoint does not know the method.
    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    /// The call reached the endpoint but failed.
    #[error("call '{method}' failed: {message}")]
    Call { method: String, message: String },

    /// No connection has been established.
    #[error("control channel not connected")]
    NotConnected,
}

/// Result type alias for remote control operations.
pub type Result<T> = std::result::Result<T, RemoteError>;
