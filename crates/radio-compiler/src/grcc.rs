//! Compiler adapter driving the external `grcc` tool.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, trace};

use crate::error::{CompileError, Result};
use crate::flowgraph::rewrite_id;
use crate::traits::FlowgraphCompiler;

const GRCC: &str = "grcc";

/// Compiles flowgraphs with `grcc`.
///
/// Each call writes the renamed flowgraph to a temp file, lets `grcc` emit
/// `<program_name>.py` into a private temp directory, reads it back and
/// deletes it.
#[derive(Debug, Clone)]
pub struct GrccCompiler {
    /// Path to the grcc binary.
    grcc_path: PathBuf,
    /// Arguments placed before the output directory and input file.
    base_args: Vec<String>,
}

impl GrccCompiler {
    /// Create a new GrccCompiler.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::ToolNotFound` if grcc is not in PATH.
    pub fn new() -> Result<Self> {
        let grcc_path = which::which(GRCC).map_err(|_| CompileError::ToolNotFound(GRCC.to_string()))?;
        debug!(path = %grcc_path.display(), "grcc found");
        Ok(Self {
            grcc_path,
            base_args: Vec::new(),
        })
    }

    /// Create a compiler using an explicit grcc binary.
    pub fn with_path(grcc_path: impl Into<PathBuf>) -> Self {
        Self {
            grcc_path: grcc_path.into(),
            base_args: Vec::new(),
        }
    }

    /// Create a compiler that runs `program` with leading `args`, e.g. a
    /// wrapper script or an interpreter in front of grcc.
    pub fn with_command(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            grcc_path: program.into(),
            base_args: args,
        }
    }

    /// Check if grcc is available in PATH.
    pub fn is_available() -> bool {
        which::which(GRCC).is_ok()
    }

    /// Returns the grcc binary in use.
    pub fn grcc_path(&self) -> &Path {
        &self.grcc_path
    }

    fn run_grcc(&self, out_dir: &Path, input: &Path) -> Result<()> {
        let dir_arg = format!("--directory={}", out_dir.display());
        info!(
            grcc = %self.grcc_path.display(),
            directory = %out_dir.display(),
            input = %input.display(),
            "running flowgraph compiler"
        );

        let output = Command::new(&self.grcc_path)
            .args(&self.base_args)
            .arg(&dir_arg)
            .arg(input)
            .output()?;
        trace!(
            status = %output.status,
            stdout_len = output.stdout.len(),
            stderr_len = output.stderr.len(),
            "grcc completed"
        );

        if output.status.success() {
            Ok(())
        } else {
            Err(CompileError::ToolFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl FlowgraphCompiler for GrccCompiler {
    fn compile(&self, program_name: &str, source: &str) -> Result<String> {
        let flowgraph = rewrite_id(program_name, source)?;

        let mut input = tempfile::Builder::new()
            .prefix(program_name)
            .suffix(".grc")
            .tempfile()?;
        input.write_all(flowgraph.as_bytes())?;
        input.flush()?;

        let out_dir = tempfile::tempdir()?;
        self.run_grcc(out_dir.path(), input.path())?;

        let generated = out_dir.path().join(format!("{}.py", program_name));
        let program = match fs::read_to_string(&generated) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CompileError::MissingOutput(generated));
            }
            Err(e) => return Err(e.into()),
        };
        fs::remove_file(&generated)?;

        debug!(program = %program_name, bytes = program.len(), "flowgraph compiled");
        Ok(program)
    }
}
