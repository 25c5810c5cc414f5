//! Log files receiving a child's standard output and error.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ProcessError, Result};

/// Open stdout/stderr log files shared by every child started while they
/// are held.
#[derive(Debug)]
pub struct OutputStreams {
    stdout: File,
    stderr: File,
    stdout_path: PathBuf,
    stderr_path: PathBuf,
}

impl OutputStreams {
    /// Opens both logs for appending, creating them and their parent
    /// directories as needed.
    pub fn open(stdout_path: &Path, stderr_path: &Path) -> Result<Self> {
        Ok(Self {
            stdout: open_log(stdout_path)?,
            stderr: open_log(stderr_path)?,
            stdout_path: stdout_path.to_path_buf(),
            stderr_path: stderr_path.to_path_buf(),
        })
    }

    /// Returns a new handle to the stdout log for a child.
    pub fn stdout(&self) -> io::Result<File> {
        self.stdout.try_clone()
    }

    /// Returns a new handle to the stderr log for a child.
    pub fn stderr(&self) -> io::Result<File> {
        self.stderr.try_clone()
    }

    /// Path of the stdout log.
    pub fn stdout_path(&self) -> &Path {
        &self.stdout_path
    }

    /// Path of the stderr log.
    pub fn stderr_path(&self) -> &Path {
        &self.stderr_path
    }
}

fn open_log(path: &Path) -> Result<File> {
    let err = |source| ProcessError::Streams {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(err)?;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(err)
}
