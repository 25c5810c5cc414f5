//! radio CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use radio_cli::cli::Cli;
use radio_cli::commands;

fn main() {
    // Load .env.local if it exists (for RADIO_HOME etc.)
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    let state_dir = cli.state_dir();

    if let Err(e) = commands::execute(cli.command, &state_dir) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
