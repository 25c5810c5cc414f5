//! Child process supervision for radio programs.
//!
//! This crate owns the single external process a supervisor runs:
//! - Start a program, killing any previous one first
//! - Kill it on demand without waiting for a graceful exit
//! - Append its stdout/stderr to log files that survive restarts
//!
//! Spawning goes through the `Spawner` trait so tests can substitute fake
//! processes for real ones.
//!
//! # Example
//!
//! ```no_run
//! use radio_process::{CommandSpawner, ProcessSupervisor};
//!
//! let spawner = CommandSpawner::new(vec!["env".into(), "python3".into()]);
//! let mut procs = ProcessSupervisor::new(
//!     Box::new(spawner),
//!     "/tmp/radio-program.log",
//!     "/tmp/radio-program-err.log",
//! );
//!
//! let pid = procs.start("/home/user/.wishful/radio/fm.py".as_ref(), &[]).unwrap();
//! println!("started {}", pid);
//!
//! procs.terminate();
//! procs.close_streams();
//! ```

pub mod error;
pub mod spawner;
pub mod streams;
pub mod supervisor;

pub use error::{ProcessError, Result};
pub use spawner::{ChildProcess, CommandSpawner, Spawner};
pub use streams::OutputStreams;
pub use supervisor::ProcessSupervisor;
