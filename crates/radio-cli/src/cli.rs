//! Command-line interface definition using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// radio - run and supervise a single radio program
#[derive(Parser, Debug)]
#[command(name = "radio")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory radio programs are stored in
    #[arg(short, long, env = "RADIO_HOME")]
    pub state_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Activate a program and supervise it until Ctrl-C or exit
    Run(RunArgs),

    /// Compile a flowgraph and print the generated program
    Compile {
        /// Program name written into the flowgraph
        name: String,

        /// Flowgraph file (.grc)
        flowgraph: String,
    },

    /// List registered programs
    List,

    /// Remove a program's artifacts
    Remove {
        /// Program name
        name: String,
    },
}

/// Arguments of `radio run`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Program name
    pub name: String,

    /// Flowgraph (.grc) or program file
    pub source: String,

    /// Source type: grc or py (default: from the file extension)
    #[arg(short = 't', long = "type")]
    pub format: Option<String>,

    /// Control port of the program
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Keep the program registered after it ends
    #[arg(short, long)]
    pub keep: bool,

    /// Command used to run the program (default: "env python3")
    #[arg(long, env = "RADIO_LAUNCHER")]
    pub launcher: Option<String>,

    /// Arguments passed to the program
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl RunArgs {
    /// Launcher split into command and arguments.
    pub fn launcher_command(&self) -> Option<Vec<String>> {
        self.launcher
            .as_deref()
            .map(|l| l.split_whitespace().map(String::from).collect())
    }
}

impl Cli {
    /// Returns the artifact directory, using the default if not specified.
    pub fn state_dir(&self) -> PathBuf {
        match &self.state_dir {
            Some(dir) => expand_path(dir),
            None => radio_runtime::paths::artifact_root(),
        }
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

/// Expands `~` and environment variables in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| shellexpand::tilde(path).into_owned());
    PathBuf::from(expanded)
}
