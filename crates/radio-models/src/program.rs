//! Registered radio programs and their source formats.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format of the source handed to the supervisor on activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// A runnable program text, stored and executed as-is.
    NativeExecutable,
    /// A flowgraph definition that must be compiled before it can run.
    CompiledFlowgraph,
}

impl SourceFormat {
    /// Returns the canonical tag for this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::NativeExecutable => "native-executable",
            SourceFormat::CompiledFlowgraph => "compiled-flowgraph",
        }
    }

    /// Returns true if the source must go through the compiler first.
    pub fn needs_compile(&self) -> bool {
        matches!(self, SourceFormat::CompiledFlowgraph)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a format tag is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown program format '{0}': expected 'compiled-flowgraph' (grc) or 'native-executable' (py)")]
pub struct FormatParseError(pub String);

impl FromStr for SourceFormat {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compiled-flowgraph" | "grc" => Ok(SourceFormat::CompiledFlowgraph),
            "native-executable" | "py" => Ok(SourceFormat::NativeExecutable),
            _ => Err(FormatParseError(s.to_string())),
        }
    }
}

/// Identity and launch configuration of a registered program.
///
/// A registration is created the first time a program is activated and is
/// never mutated afterwards; stopping the program destroys it together with
/// its artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramRegistration {
    /// Unique program name; also the artifact base name.
    pub name: String,

    /// Arguments passed to the program on start.
    #[serde(default)]
    pub launch_args: Vec<String>,

    /// Port the program's control endpoint listens on.
    pub control_port: u16,

    /// Format the program was registered from.
    pub source_format: SourceFormat,

    /// Runnable artifact on disk.
    pub artifact_path: PathBuf,

    /// When the program was registered.
    pub registered_at: DateTime<Utc>,
}

impl ProgramRegistration {
    /// Creates a new registration.
    pub fn new(
        name: impl Into<String>,
        launch_args: Vec<String>,
        control_port: u16,
        source_format: SourceFormat,
        artifact_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            launch_args,
            control_port,
            source_format,
            artifact_path: artifact_path.into(),
            registered_at: Utc::now(),
        }
    }
}

impl PartialEq for ProgramRegistration {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ProgramRegistration {}
