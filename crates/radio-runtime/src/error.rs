//! Error types for the lifecycle supervisor.

use radio_models::ProgramState;
use thiserror::Error;

/// Errors that can occur in supervisor operations.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The request was malformed; nothing was touched.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The flowgraph could not be compiled.
    #[error("compile failed: {0}")]
    Compile(#[from] radio_compiler::CompileError),

    /// The program process could not be started.
    #[error("process start failed: {0}")]
    ProcessStart(#[from] radio_process::ProcessError),

    /// The artifact store failed.
    #[error("artifact store error: {0}")]
    Store(#[from] radio_store::StoreError),

    /// A remote control call failed.
    #[error("remote control error: {0}")]
    Remote(#[from] radio_control::RemoteError),

    /// The paused program's process is gone.
    #[error("program '{0}' exited while paused")]
    ProcessExited(String),

    /// The operation is not allowed in the current state.
    #[error("cannot {operation} while {state}: {detail}")]
    StateViolation {
        operation: &'static str,
        state: ProgramState,
        detail: String,
    },
}

impl SupervisorError {
    /// Returns true for requests rejected because of the session state.
    pub fn is_state_violation(&self) -> bool {
        matches!(self, SupervisorError::StateViolation { .. })
    }
}

/// Result type for supervisor operations.
pub type Result<T> = std::result::Result<T, SupervisorError>;
