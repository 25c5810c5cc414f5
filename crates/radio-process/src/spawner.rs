//! Process spawning seam.

use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use tracing::{debug, trace};

use crate::streams::OutputStreams;

/// A running child process owned by the supervisor.
pub trait ChildProcess: Send + fmt::Debug {
    /// OS process id.
    fn id(&self) -> u32;

    /// Sends an immediate kill signal and reaps the process.
    fn kill(&mut self) -> io::Result<()>;

    /// Returns true if the process has not exited yet.
    fn is_alive(&mut self) -> bool;
}

/// Starts child processes.
pub trait Spawner: Send + Sync {
    /// Starts `program` with `args`, wiring its output to `streams`.
    fn spawn(
        &self,
        program: &Path,
        args: &[String],
        streams: &OutputStreams,
    ) -> io::Result<Box<dyn ChildProcess>>;
}

/// Spawns real OS processes, optionally through a launcher such as
/// `env python3`.
#[derive(Debug, Clone, Default)]
pub struct CommandSpawner {
    /// Command and arguments placed before the program path.
    launcher: Vec<String>,
}

impl CommandSpawner {
    /// Creates a spawner that runs programs through `launcher`.
    ///
    /// An empty launcher executes the program path directly.
    pub fn new(launcher: Vec<String>) -> Self {
        Self { launcher }
    }

    /// Creates a spawner that executes programs directly.
    pub fn direct() -> Self {
        Self::default()
    }

    /// Returns the launcher prefix.
    pub fn launcher(&self) -> &[String] {
        &self.launcher
    }

    /// Check if the launcher command can be found in PATH.
    pub fn is_available(&self) -> bool {
        match self.launcher.first() {
            Some(cmd) => which::which(cmd).is_ok(),
            None => true,
        }
    }

    fn command(&self, program: &Path) -> Command {
        match self.launcher.split_first() {
            Some((cmd, rest)) => {
                let mut command = Command::new(cmd);
                command.args(rest).arg(program);
                command
            }
            None => Command::new(program),
        }
    }
}

impl Spawner for CommandSpawner {
    fn spawn(
        &self,
        program: &Path,
        args: &[String],
        streams: &OutputStreams,
    ) -> io::Result<Box<dyn ChildProcess>> {
        let mut command = self.command(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(streams.stdout()?))
            .stderr(Stdio::from(streams.stderr()?));

        debug!(command = ?command, "spawning program");
        let child = command.spawn()?;
        Ok(Box::new(OsChild(child)))
    }
}

/// A `std::process::Child` owned by the supervisor.
#[derive(Debug)]
struct OsChild(Child);

impl ChildProcess for OsChild {
    fn id(&self) -> u32 {
        self.0.id()
    }

    fn kill(&mut self) -> io::Result<()> {
        match self.0.kill() {
            Ok(()) => {}
            // Already exited and reaped
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => {}
            Err(e) => return Err(e),
        }
        let status = self.0.wait()?;
        trace!(pid = self.0.id(), status = %status, "child reaped");
        Ok(())
    }

    fn is_alive(&mut self) -> bool {
        matches!(self.0.try_wait(), Ok(None))
    }
}
