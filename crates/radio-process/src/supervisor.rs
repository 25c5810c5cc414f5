//! Supervisor of the single radio program process.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::error::{ProcessError, Result};
use crate::spawner::{ChildProcess, Spawner};
use crate::streams::OutputStreams;

/// Owns at most one live child process and its output logs.
pub struct ProcessSupervisor {
    /// Starts child processes.
    spawner: Box<dyn Spawner>,
    /// Where child stdout is appended.
    stdout_log: PathBuf,
    /// Where child stderr is appended.
    stderr_log: PathBuf,
    /// Output logs, opened on first start and reused until closed.
    streams: Option<OutputStreams>,
    /// The live child, if any.
    child: Option<Box<dyn ChildProcess>>,
}

impl std::fmt::Debug for ProcessSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessSupervisor")
            .field("stdout_log", &self.stdout_log)
            .field("stderr_log", &self.stderr_log)
            .field("streams_open", &self.streams.is_some())
            .field("child", &self.child)
            .finish()
    }
}

impl ProcessSupervisor {
    /// Creates a supervisor that appends child output to the given logs.
    pub fn new(
        spawner: Box<dyn Spawner>,
        stdout_log: impl Into<PathBuf>,
        stderr_log: impl Into<PathBuf>,
    ) -> Self {
        Self {
            spawner,
            stdout_log: stdout_log.into(),
            stderr_log: stderr_log.into(),
            streams: None,
            child: None,
        }
    }

    /// Starts `program` and returns its pid.
    ///
    /// Any process started earlier is killed first. On failure no process
    /// is held and the output logs are closed.
    pub fn start(&mut self, program: &Path, args: &[String]) -> Result<u32> {
        if self.child.is_some() {
            debug!("a program is already running; killing it first");
            self.terminate();
        }

        let streams = match self.streams.take() {
            Some(streams) => streams,
            None => OutputStreams::open(&self.stdout_log, &self.stderr_log).map_err(|e| {
                error!(error = %e, "failed to open program output logs");
                e
            })?,
        };

        info!(program = %program.display(), args = ?args, "starting program");
        match self.spawner.spawn(program, args, &streams) {
            Ok(child) => {
                let pid = child.id();
                info!(program = %program.display(), pid = pid, "program started");
                self.streams = Some(streams);
                self.child = Some(child);
                Ok(pid)
            }
            Err(source) => {
                error!(program = %program.display(), error = %source, "failed to start program");
                Err(ProcessError::Spawn {
                    program: program.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Kills the held process, if any, without waiting for a graceful exit.
    pub fn terminate(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        let pid = child.id();
        match child.kill() {
            Ok(()) => info!(pid = pid, "program killed"),
            Err(e) => warn!(pid = pid, error = %e, "failed to kill program"),
        }
    }

    /// Closes the output logs. The next start reopens them.
    pub fn close_streams(&mut self) {
        if self.streams.take().is_some() {
            debug!("closed program output logs");
        }
    }

    /// Returns true if a process is held.
    pub fn has_process(&self) -> bool {
        self.child.is_some()
    }

    /// Returns true if the held process has not exited.
    pub fn is_alive(&mut self) -> bool {
        self.child.as_mut().is_some_and(|c| c.is_alive())
    }

    /// Pid of the held process.
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(|c| c.id())
    }

    /// Returns true if the output logs are open.
    pub fn streams_open(&self) -> bool {
        self.streams.is_some()
    }
}

impl Drop for ProcessSupervisor {
    fn drop(&mut self) {
        self.terminate();
    }
}
