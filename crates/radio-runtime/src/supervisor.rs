//! Lifecycle supervisor for the single active radio program.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use radio_compiler::FlowgraphCompiler;
use radio_control::{ControlChannel, ParameterFailure, RemoteError, RpcConnector};
use radio_models::{ParamValue, ProgramRegistration, ProgramState};
use radio_process::{ProcessSupervisor, Spawner};
use radio_store::{ArtifactKind, ArtifactStore};

use crate::config::SupervisorConfig;
use crate::error::{Result, SupervisorError};
use crate::event::SupervisorEvent;
use crate::request::ActivationRequest;

/// A supervisor shared between threads; the lock serializes transitions.
pub type SharedSupervisor = Arc<Mutex<LifecycleSupervisor>>;

/// What a successful activation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A new program process was started.
    Started {
        /// OS process id.
        pid: u32,
    },
    /// A paused program was put back under control.
    Resumed,
}

/// What a successful deactivation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deactivation {
    /// The program's flowgraph was stopped; its process lives on.
    Paused,
    /// The program was killed and removed from the repository.
    Stopped,
}

/// Sequences compile, register, start, control, pause/resume and stop for
/// at most one program at a time.
///
/// State-changing operations take `&mut self`, so callers are serialized by
/// construction. Each operation comes in two forms: `try_*` returns a
/// `Result`, and the plain form logs failures and reports an outcome the
/// way a host dispatcher expects.
pub struct LifecycleSupervisor {
    config: SupervisorConfig,
    store: ArtifactStore,
    compiler: Box<dyn FlowgraphCompiler>,
    processes: ProcessSupervisor,
    channel: ControlChannel,
    /// Registered programs keyed by name.
    registrations: HashMap<String, ProgramRegistration>,
    state: ProgramState,
    /// Program bound to the session while Running or Paused.
    active: Option<String>,
    event_tx: broadcast::Sender<SupervisorEvent>,
}

impl fmt::Debug for LifecycleSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleSupervisor")
            .field("state", &self.state)
            .field("active", &self.active)
            .field("registrations", &self.registrations.len())
            .field("processes", &self.processes)
            .field("channel", &self.channel)
            .finish()
    }
}

impl LifecycleSupervisor {
    /// Creates an inactive supervisor from its collaborators.
    pub fn new(
        config: SupervisorConfig,
        compiler: Box<dyn FlowgraphCompiler>,
        spawner: Box<dyn Spawner>,
        connector: Box<dyn RpcConnector>,
    ) -> Self {
        let store = ArtifactStore::new(config.artifact_root.clone());
        let processes = ProcessSupervisor::new(
            spawner,
            config.stdout_log.clone(),
            config.stderr_log.clone(),
        );
        let channel = ControlChannel::new(connector, config.control_host.clone());
        let (event_tx, _) = broadcast::channel(64);

        debug!(root = %config.artifact_root.display(), "supervisor initialized");

        Self {
            config,
            store,
            compiler,
            processes,
            channel,
            registrations: HashMap::new(),
            state: ProgramState::Inactive,
            active: None,
            event_tx,
        }
    }

    /// Reloads registrations persisted by an earlier supervisor run.
    ///
    /// Returns how many programs were restored.
    pub fn restore(&mut self) -> Result<usize> {
        let mut restored = 0;
        for reg in self.store.load_registrations()? {
            if !self.registrations.contains_key(&reg.name) {
                debug!(program = %reg.name, "restored registration");
                self.registrations.insert(reg.name.clone(), reg);
                restored += 1;
            }
        }
        info!(count = restored, "restored radio programs from repository");
        Ok(restored)
    }

    /// Wraps the supervisor for sharing between threads.
    pub fn shared(self) -> SharedSupervisor {
        Arc::new(Mutex::new(self))
    }

    // ==================== Introspection ====================

    /// Returns the configuration.
    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Returns the artifact store.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Current session state.
    pub fn state(&self) -> ProgramState {
        self.state
    }

    /// Program bound to the session, whether running or paused.
    pub fn active_program(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Registration of a program, if registered.
    pub fn registration(&self, name: &str) -> Option<&ProgramRegistration> {
        self.registrations.get(name)
    }

    /// Names of all registered programs, sorted.
    pub fn registered_programs(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.registrations.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Pid of the supervised process.
    pub fn pid(&self) -> Option<u32> {
        self.processes.pid()
    }

    /// Returns true if the supervised process has not exited.
    pub fn is_process_alive(&mut self) -> bool {
        self.processes.is_alive()
    }

    /// Returns true if a control connection is cached.
    pub fn is_control_connected(&self) -> bool {
        self.channel.is_connected()
    }

    /// Subscribe to supervisor events.
    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorEvent> {
        self.event_tx.subscribe()
    }

    fn emit_event(&self, event: SupervisorEvent) {
        // No receivers is fine
        let _ = self.event_tx.send(event);
    }

    fn violation(&self, operation: &'static str, detail: impl Into<String>) -> SupervisorError {
        SupervisorError::StateViolation {
            operation,
            state: self.state,
            detail: detail.into(),
        }
    }

    // ==================== Host operations ====================

    /// Returns the running program's name.
    ///
    /// A paused program is not reported as running.
    pub fn running_program(&self) -> Option<&str> {
        match self.state {
            ProgramState::Running => self.active.as_deref(),
            _ => None,
        }
    }

    /// Activates a program, or resumes it if it is the paused program.
    ///
    /// Returns `Some(true)` on success, `Some(false)` if the activation
    /// failed, and `None` if the session state forbids it.
    pub fn activate(&mut self, request: ActivationRequest) -> Option<bool> {
        match self.try_activate(request) {
            Ok(_) => Some(true),
            Err(e) if e.is_state_violation() => {
                warn!(error = %e, "please deactivate the old radio program before activating a new one");
                None
            }
            Err(e) => {
                error!(error = %e, "activation failed");
                Some(false)
            }
        }
    }

    /// Pauses (`pause = true`) or stops the named program.
    pub fn deactivate(&mut self, name: &str, pause: bool) {
        match self.try_deactivate(name, pause) {
            Ok(_) => {}
            Err(e) if e.is_state_violation() => warn!(error = %e, "ignoring deactivate"),
            Err(e) => error!(program = %name, error = %e, "deactivate failed"),
        }
    }

    /// Writes runtime parameters of the active program.
    ///
    /// Keys that cannot be written are logged and skipped.
    pub fn set_parameters(&mut self, params: &HashMap<String, ParamValue>) {
        match self.try_set_parameters(params) {
            Ok(failures) if failures.is_empty() => {}
            Ok(failures) => {
                for failure in &failures {
                    warn!(key = %failure.key, error = %failure.error, "parameter not set");
                }
                warn!(
                    failed = failures.len(),
                    total = params.len(),
                    "some parameters were not set"
                );
            }
            Err(e) if e.is_state_violation() => warn!(error = %e, "ignoring set_parameters"),
            Err(e) => error!(error = %e, "set_parameters failed"),
        }
    }

    /// Reads runtime parameters of the active program.
    ///
    /// Keys that cannot be read, including every key when the program's
    /// control endpoint is unreachable, are left out. Returns `None` only
    /// if no program is active.
    pub fn get_parameters(&mut self, keys: &[String]) -> Option<HashMap<String, ParamValue>> {
        match self.try_get_parameters(keys) {
            Ok(values) => Some(values),
            Err(e) if e.is_state_violation() => {
                warn!(error = %e, "ignoring get_parameters");
                None
            }
            Err(e) => {
                error!(error = %e, "get_parameters failed");
                None
            }
        }
    }

    // ==================== Transitions ====================

    /// Activates a program; see [`LifecycleSupervisor::activate`].
    pub fn try_activate(&mut self, request: ActivationRequest) -> Result<Activation> {
        let name = request.name.clone();
        let state = self.state;
        let result = match state {
            ProgramState::Inactive => self.start_program(request),
            ProgramState::Paused if self.active.as_deref() == Some(name.as_str()) => self.resume(),
            _ => Err(self.violation(
                "activate",
                format!(
                    "program '{}' is bound; deactivate it before activating '{}'",
                    self.active.as_deref().unwrap_or("<none>"),
                    name
                ),
            )),
        };

        if let Err(e) = &result {
            if !e.is_state_violation() {
                self.emit_event(SupervisorEvent::ActivationFailed {
                    program: name,
                    error: e.to_string(),
                });
            }
        }
        result
    }

    fn start_program(&mut self, request: ActivationRequest) -> Result<Activation> {
        request.validate()?;
        info!(program = %request.name, format = %request.format, "starting new radio program");

        let executable = if request.format.needs_compile() {
            self.compiler.compile(&request.name, &request.source)?
        } else {
            request.source.clone()
        };

        if !self.registrations.contains_key(&request.name) {
            let reg = self.register(&request, &executable)?;
            self.registrations.insert(request.name.clone(), reg);
        }

        let Some(reg) = self.registrations.get(&request.name) else {
            return Err(self.violation("activate", "registration disappeared"));
        };

        // A failed start keeps the registration so a retry reuses the artifact
        let pid = self.processes.start(&reg.artifact_path, &reg.launch_args)?;

        self.state = ProgramState::Running;
        self.active = Some(request.name.clone());
        info!(program = %request.name, pid = pid, "radio program running");

        self.emit_event(SupervisorEvent::Started {
            program: request.name,
            pid,
        });
        Ok(Activation::Started { pid })
    }

    fn register(
        &self,
        request: &ActivationRequest,
        executable: &str,
    ) -> Result<ProgramRegistration> {
        let path = self
            .store
            .put(&request.name, ArtifactKind::Executable, executable)?;
        if request.format.needs_compile() {
            self.store
                .put(&request.name, ArtifactKind::Flowgraph, &request.source)?;
        }

        let reg = ProgramRegistration::new(
            request.name.clone(),
            request.args.clone(),
            request.port.unwrap_or(self.config.default_port),
            request.format,
            path,
        );

        // The index only speeds up later restores
        if let Err(e) = self.store.save_registration(&reg) {
            warn!(program = %reg.name, error = %e, "failed to persist registration");
        }
        Ok(reg)
    }

    fn resume(&mut self) -> Result<Activation> {
        let name = self.active.clone().unwrap_or_default();
        info!(program = %name, "waking up radio program");

        if self.config.verify_on_resume && !self.processes.is_alive() {
            return Err(SupervisorError::ProcessExited(name));
        }

        // Optimistic: an unreachable endpoint does not block the resume
        if let Err(e) = self.connect_channel() {
            warn!(program = %name, error = %e, "control channel not confirmed on resume");
        }

        self.state = ProgramState::Running;
        self.emit_event(SupervisorEvent::Resumed { program: name });
        Ok(Activation::Resumed)
    }

    /// Pauses or stops the named program; see
    /// [`LifecycleSupervisor::deactivate`].
    pub fn try_deactivate(&mut self, name: &str, pause: bool) -> Result<Deactivation> {
        if self.active.as_deref() != Some(name) {
            return Err(self.violation(
                "deactivate",
                format!(
                    "program '{}' is not running; running program is {}",
                    name,
                    self.active.as_deref().unwrap_or("<none>")
                ),
            ));
        }

        if !self.state.is_active() {
            return Err(self.violation("deactivate", "no running or paused radio program"));
        }

        if pause {
            self.pause(name)
        } else {
            self.stop(name)
        }
    }

    fn pause(&mut self, name: &str) -> Result<Deactivation> {
        info!(program = %name, "pausing radio program");
        self.connect_channel()?;
        self.channel.stop_and_wait()?;

        self.state = ProgramState::Paused;
        self.emit_event(SupervisorEvent::Paused {
            program: name.to_string(),
        });
        Ok(Deactivation::Paused)
    }

    fn stop(&mut self, name: &str) -> Result<Deactivation> {
        info!(program = %name, "stopping radio program");
        self.state = ProgramState::StoppedPendingCleanup;

        self.release_handles();
        self.registrations.remove(name);
        let removed = self.store.remove(name);

        self.state = ProgramState::Inactive;
        self.active = None;
        self.emit_event(SupervisorEvent::Stopped {
            program: name.to_string(),
        });

        removed?;
        Ok(Deactivation::Stopped)
    }

    /// Kills the program and drops every handle without removing artifacts.
    pub fn shutdown(&mut self) {
        let Some(name) = self.active.take() else {
            self.release_handles();
            return;
        };

        info!(program = %name, "shutting down supervisor");
        self.release_handles();
        self.state = ProgramState::Inactive;
        self.emit_event(SupervisorEvent::Stopped { program: name });
    }

    fn release_handles(&mut self) {
        self.processes.terminate();
        self.processes.close_streams();
        self.channel.close();
    }

    // ==================== Parameters ====================

    fn connect_channel(&mut self) -> Result<()> {
        let port = self
            .active
            .as_deref()
            .and_then(|name| self.registrations.get(name))
            .map(|reg| reg.control_port)
            .ok_or_else(|| self.violation("connect", "no registered active program"))?;
        self.channel.connect(port)?;
        Ok(())
    }

    /// Connects for a parameter batch. An unreachable endpoint is returned
    /// as a value so the batch can record it per key.
    fn connect_for_batch(&mut self) -> Result<Option<RemoteError>> {
        match self.connect_channel() {
            Ok(()) => Ok(None),
            Err(SupervisorError::Remote(e)) => {
                warn!(host = %self.channel.host(), error = %e, "control endpoint unreachable");
                Ok(Some(e))
            }
            Err(e) => Err(e),
        }
    }

    /// Writes runtime parameters; returns the keys that failed.
    pub fn try_set_parameters(
        &mut self,
        params: &HashMap<String, ParamValue>,
    ) -> Result<Vec<ParameterFailure>> {
        if !self.state.is_active() {
            return Err(self.violation("set parameters", "no running or paused radio program"));
        }
        if let Some(error) = self.connect_for_batch()? {
            let mut keys: Vec<&String> = params.keys().collect();
            keys.sort();
            return Ok(keys
                .into_iter()
                .map(|key| unreachable_key(key, &error))
                .collect());
        }
        Ok(self.channel.set_parameters(params))
    }

    /// Reads runtime parameters; keys that fail are left out.
    pub fn try_get_parameters(&mut self, keys: &[String]) -> Result<HashMap<String, ParamValue>> {
        if !self.state.is_active() {
            return Err(self.violation("get parameters", "no running or paused radio program"));
        }
        if let Some(error) = self.connect_for_batch()? {
            for key in keys {
                let failure = unreachable_key(key, &error);
                debug!(key = %failure.key, error = %failure.error, "parameter not read");
            }
            return Ok(HashMap::new());
        }

        let (values, failures) = self.channel.get_parameters(keys);
        if !failures.is_empty() {
            debug!(failed = failures.len(), "some parameters could not be read");
        }
        info!(values = ?values, "returning parameters");
        Ok(values)
    }
}

fn unreachable_key(key: &str, error: &RemoteError) -> ParameterFailure {
    ParameterFailure {
        key: key.to_string(),
        error: RemoteError::Call {
            method: key.to_string(),
            message: error.to_string(),
        },
    }
}
