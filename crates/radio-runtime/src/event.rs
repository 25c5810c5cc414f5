//! Supervisor events.

/// Events emitted by the supervisor as programs change state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// A program process was started.
    Started {
        /// Program name.
        program: String,
        /// OS process id.
        pid: u32,
    },
    /// A running program was paused.
    Paused {
        /// Program name.
        program: String,
    },
    /// A paused program was resumed.
    Resumed {
        /// Program name.
        program: String,
    },
    /// A program was stopped and its process killed.
    Stopped {
        /// Program name.
        program: String,
    },
    /// An activation failed.
    ActivationFailed {
        /// Program name.
        program: String,
        /// Error message.
        error: String,
    },
}

impl SupervisorEvent {
    /// Returns the program this event is about.
    pub fn program(&self) -> &str {
        match self {
            SupervisorEvent::Started { program, .. } => program,
            SupervisorEvent::Paused { program } => program,
            SupervisorEvent::Resumed { program } => program,
            SupervisorEvent::Stopped { program } => program,
            SupervisorEvent::ActivationFailed { program, .. } => program,
        }
    }

    /// Returns true if this is an error event.
    pub fn is_error(&self) -> bool {
        matches!(self, SupervisorEvent::ActivationFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_program() {
        let events = [
            SupervisorEvent::Started {
                program: "fm".to_string(),
                pid: 7,
            },
            SupervisorEvent::Paused {
                program: "fm".to_string(),
            },
            SupervisorEvent::Resumed {
                program: "fm".to_string(),
            },
            SupervisorEvent::Stopped {
                program: "fm".to_string(),
            },
            SupervisorEvent::ActivationFailed {
                program: "fm".to_string(),
                error: "boom".to_string(),
            },
        ];
        assert!(events.iter().all(|e| e.program() == "fm"));
    }

    #[test]
    fn test_event_is_error() {
        let ok = SupervisorEvent::Stopped {
            program: "fm".to_string(),
        };
        let err = SupervisorEvent::ActivationFailed {
            program: "fm".to_string(),
            error: "grcc missing".to_string(),
        };
        assert!(!ok.is_error());
        assert!(err.is_error());
    }
}
