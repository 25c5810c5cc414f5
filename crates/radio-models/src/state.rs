//! Lifecycle state of the supervised session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the supervisor session.
///
/// ```text
/// Inactive --activate--> Running --pause--> Paused --activate--> Running
///     ^                     |                  |
///     +-------stop----------+-------stop-------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgramState {
    /// No program bound to the session.
    #[default]
    Inactive,
    /// A program process is running and controllable.
    Running,
    /// The program was asked to stop its flowgraph; the process is still alive.
    Paused,
    /// Teardown of a stopped program is in progress.
    StoppedPendingCleanup,
}

impl ProgramState {
    /// Returns true if a process and control channel may be bound.
    pub fn is_active(&self) -> bool {
        matches!(self, ProgramState::Running | ProgramState::Paused)
    }
}

impl fmt::Display for ProgramState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProgramState::Inactive => "inactive",
            ProgramState::Running => "running",
            ProgramState::Paused => "paused",
            ProgramState::StoppedPendingCleanup => "stopped-pending-cleanup",
        };
        f.write_str(s)
    }
}
