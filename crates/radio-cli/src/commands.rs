//! Command handlers.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use radio_compiler::{FlowgraphCompiler, GrccCompiler};
use radio_control::{RemoteError, RpcClient, RpcConnector};
use radio_models::SourceFormat;
use radio_process::CommandSpawner;
use radio_runtime::{Activation, ActivationRequest, LifecycleSupervisor, SupervisorConfig};
use radio_store::ArtifactStore;

use crate::cli::{expand_path, Commands, RunArgs};

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Execute a CLI command against the artifact directory.
pub fn execute(command: Commands, state_dir: &Path) -> Result<()> {
    match command {
        Commands::Run(args) => cmd_run(state_dir, &args),
        Commands::Compile { name, flowgraph } => cmd_compile(&name, &flowgraph),
        Commands::List => cmd_list(state_dir),
        Commands::Remove { name } => cmd_remove(state_dir, &name),
    }
}

/// Connector used when no control transport is available.
///
/// Every connection attempt is refused, so parameter access and pausing
/// fail while start and stop still work.
#[derive(Debug, Default)]
pub struct NoTransport;

impl RpcConnector for NoTransport {
    fn connect(&self, host: &str, port: u16) -> radio_control::Result<Box<dyn RpcClient>> {
        Err(RemoteError::Connect {
            endpoint: format!("{}:{}", host, port),
            message: "no control transport configured".to_string(),
        })
    }
}

/// Picks the source format from an explicit tag or the file extension.
pub fn source_format(path: &Path, tag: Option<&str>) -> Result<SourceFormat> {
    if let Some(tag) = tag {
        return Ok(tag.parse()?);
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("grc") => Ok(SourceFormat::CompiledFlowgraph),
        _ => Ok(SourceFormat::NativeExecutable),
    }
}

fn cmd_run(state_dir: &Path, args: &RunArgs) -> Result<()> {
    let source_path = expand_path(&args.source);
    let format = source_format(&source_path, args.format.as_deref())?;
    let source = fs::read_to_string(&source_path)
        .map_err(|e| format!("Cannot read {}: {}", source_path.display(), e))?;

    let mut config = SupervisorConfig::new().with_artifact_root(state_dir);
    if let Some(launcher) = args.launcher_command() {
        config = config.with_launcher(launcher);
    }

    let compiler = match GrccCompiler::new() {
        Ok(compiler) => compiler,
        Err(e) if format.needs_compile() => return Err(e.into()),
        Err(_) => GrccCompiler::with_path("grcc"),
    };
    let spawner = CommandSpawner::new(config.launcher.clone());
    if !spawner.is_available() {
        warn!(launcher = ?spawner.launcher(), "launcher not found in PATH");
    }

    let mut supervisor = LifecycleSupervisor::new(
        config,
        Box::new(compiler),
        Box::new(spawner),
        Box::new(NoTransport),
    );
    supervisor.restore()?;
    let mut events = supervisor.subscribe();

    let mut request = ActivationRequest::new(&args.name, source, format).with_args(args.args.clone());
    if let Some(port) = args.port {
        request = request.with_port(port);
    }

    match supervisor.try_activate(request)? {
        Activation::Started { pid } => println!("Started '{}' (pid {})", args.name, pid),
        Activation::Resumed => println!("Resumed '{}'", args.name),
    }

    let term = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&term))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&term))?;

    while !term.load(Ordering::Relaxed) && supervisor.is_process_alive() {
        std::thread::sleep(POLL_INTERVAL);
    }

    if term.load(Ordering::Relaxed) {
        info!(program = %args.name, "interrupted");
    } else {
        println!("'{}' exited", args.name);
    }

    if args.keep {
        supervisor.shutdown();
        println!("Stopped '{}' (kept in {})", args.name, state_dir.display());
    } else {
        supervisor.try_deactivate(&args.name, false)?;
        println!("Stopped and removed '{}'", args.name);
    }

    while let Ok(event) = events.try_recv() {
        debug!(program = %event.program(), error = event.is_error(), event = ?event, "supervisor event");
    }
    Ok(())
}

fn cmd_compile(name: &str, flowgraph: &str) -> Result<()> {
    let path = expand_path(flowgraph);
    let source = fs::read_to_string(&path)
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;

    let compiler = GrccCompiler::new()?;
    let program = compiler.compile(name, &source)?;
    print!("{}", program);
    Ok(())
}

fn cmd_list(state_dir: &Path) -> Result<()> {
    let store = ArtifactStore::new(state_dir);
    let registrations = store.load_registrations()?;

    if registrations.is_empty() {
        println!("No radio programs registered.");
        return Ok(());
    }

    println!("{:<24}  {:<20}  {:<6}  ARGS", "NAME", "FORMAT", "PORT");
    println!("{}", "-".repeat(70));
    for reg in &registrations {
        println!(
            "{:<24}  {:<20}  {:<6}  {}",
            truncate(&reg.name, 24),
            reg.source_format,
            reg.control_port,
            reg.launch_args.join(" ")
        );
    }
    println!("\n{} program(s)", registrations.len());
    Ok(())
}

fn cmd_remove(state_dir: &Path, name: &str) -> Result<()> {
    let store = ArtifactStore::new(state_dir);
    store.remove(name)?;
    println!("Removed '{}'", name);
    Ok(())
}

/// Truncate a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
