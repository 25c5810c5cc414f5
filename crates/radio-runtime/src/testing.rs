//! Recording fakes for supervisor tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tempfile::{tempdir, TempDir};

use radio_compiler::{CompileError, FlowgraphCompiler};
use radio_control::{RemoteError, RpcClient, RpcConnector};
use radio_models::ParamValue;
use radio_process::{ChildProcess, OutputStreams, Spawner};

use crate::config::SupervisorConfig;
use crate::supervisor::LifecycleSupervisor;

const FIRST_PID: u32 = 1000;

#[derive(Debug, Default)]
struct SpawnLog {
    spawned: Vec<(PathBuf, Vec<String>)>,
    kills: Vec<u32>,
    exited: bool,
    fail: bool,
}

/// Spawner that hands out fake children and records what happened to them.
#[derive(Debug, Clone, Default)]
pub struct FakeSpawner {
    log: Arc<Mutex<SpawnLog>>,
}

impl FakeSpawner {
    pub fn fail(&self, fail: bool) {
        self.log.lock().unwrap().fail = fail;
    }

    /// Marks every child as exited on its own.
    pub fn exit_all(&self) {
        self.log.lock().unwrap().exited = true;
    }

    pub fn spawned(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.log.lock().unwrap().spawned.clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.log.lock().unwrap().spawned.len()
    }

    pub fn kills(&self) -> Vec<u32> {
        self.log.lock().unwrap().kills.clone()
    }
}

impl Spawner for FakeSpawner {
    fn spawn(
        &self,
        program: &Path,
        args: &[String],
        _streams: &OutputStreams,
    ) -> io::Result<Box<dyn ChildProcess>> {
        let mut log = self.log.lock().unwrap();
        if log.fail {
            return Err(io::Error::new(io::ErrorKind::NotFound, "launcher not found"));
        }
        log.exited = false;
        log.spawned.push((program.to_path_buf(), args.to_vec()));
        let pid = FIRST_PID + log.spawned.len() as u32 - 1;
        Ok(Box::new(FakeChild {
            pid,
            log: Arc::clone(&self.log),
        }))
    }
}

#[derive(Debug)]
struct FakeChild {
    pid: u32,
    log: Arc<Mutex<SpawnLog>>,
}

impl ChildProcess for FakeChild {
    fn id(&self) -> u32 {
        self.pid
    }

    fn kill(&mut self) -> io::Result<()> {
        self.log.lock().unwrap().kills.push(self.pid);
        Ok(())
    }

    fn is_alive(&mut self) -> bool {
        let log = self.log.lock().unwrap();
        !log.exited && !log.kills.contains(&self.pid)
    }
}

#[derive(Debug)]
struct RpcLog {
    connects: Vec<(String, u16)>,
    methods: Vec<String>,
    params: HashMap<String, ParamValue>,
    refuse: bool,
    fail_stop: bool,
}

impl Default for RpcLog {
    fn default() -> Self {
        let mut params = HashMap::new();
        params.insert("freq".to_string(), json!(100.0));
        params.insert("gain".to_string(), json!(10));
        Self {
            connects: Vec::new(),
            methods: Vec::new(),
            params,
            refuse: false,
            fail_stop: false,
        }
    }
}

/// Connector to an in-memory endpoint exposing `freq` and `gain`.
#[derive(Debug, Clone, Default)]
pub struct FakeConnector {
    log: Arc<Mutex<RpcLog>>,
}

impl FakeConnector {
    pub fn refuse(&self, refuse: bool) {
        self.log.lock().unwrap().refuse = refuse;
    }

    pub fn fail_stop(&self, fail: bool) {
        self.log.lock().unwrap().fail_stop = fail;
    }

    pub fn connects(&self) -> Vec<(String, u16)> {
        self.log.lock().unwrap().connects.clone()
    }

    pub fn connect_count(&self) -> usize {
        self.log.lock().unwrap().connects.len()
    }

    pub fn methods(&self) -> Vec<String> {
        self.log.lock().unwrap().methods.clone()
    }

    pub fn value(&self, key: &str) -> Option<ParamValue> {
        self.log.lock().unwrap().params.get(key).cloned()
    }
}

impl RpcConnector for FakeConnector {
    fn connect(&self, host: &str, port: u16) -> radio_control::Result<Box<dyn RpcClient>> {
        let mut log = self.log.lock().unwrap();
        log.connects.push((host.to_string(), port));
        if log.refuse {
            return Err(RemoteError::Connect {
                endpoint: format!("{}:{}", host, port),
                message: "connection refused".to_string(),
            });
        }
        Ok(Box::new(FakeClient {
            log: Arc::clone(&self.log),
        }))
    }
}

struct FakeClient {
    log: Arc<Mutex<RpcLog>>,
}

impl RpcClient for FakeClient {
    fn call(&mut self, method: &str, args: &[ParamValue]) -> radio_control::Result<ParamValue> {
        let mut log = self.log.lock().unwrap();
        log.methods.push(method.to_string());

        match method {
            "stop" if log.fail_stop => {
                return Err(RemoteError::Call {
                    method: method.to_string(),
                    message: "flowgraph not running".to_string(),
                })
            }
            "stop" | "wait" => return Ok(ParamValue::Null),
            _ => {}
        }
        if let Some(key) = method.strip_prefix("set_") {
            if let Some(slot) = log.params.get_mut(key) {
                *slot = args.first().cloned().unwrap_or(ParamValue::Null);
                return Ok(ParamValue::Null);
            }
        }
        if let Some(key) = method.strip_prefix("get_") {
            if let Some(value) = log.params.get(key) {
                return Ok(value.clone());
            }
        }
        Err(RemoteError::UnknownMethod(method.to_string()))
    }
}

#[derive(Debug, Default)]
struct CompileLog {
    calls: Vec<String>,
    fail: bool,
}

/// Compiler that emits a one-line program named after its input.
#[derive(Debug, Clone, Default)]
pub struct FakeCompiler {
    log: Arc<Mutex<CompileLog>>,
}

impl FakeCompiler {
    pub fn fail(&self, fail: bool) {
        self.log.lock().unwrap().fail = fail;
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().calls.clone()
    }
}

impl FlowgraphCompiler for FakeCompiler {
    fn compile(&self, program_name: &str, _source: &str) -> radio_compiler::Result<String> {
        let mut log = self.log.lock().unwrap();
        log.calls.push(program_name.to_string());
        if log.fail {
            return Err(CompileError::ToolFailed {
                status: "exit status: 1".to_string(),
                stderr: "bad flowgraph".to_string(),
            });
        }
        Ok(format!("# generated from {}", program_name))
    }
}

/// A supervisor over a temporary repository, with handles on its fakes.
pub struct Harness {
    pub supervisor: LifecycleSupervisor,
    pub spawner: FakeSpawner,
    pub rpc: FakeConnector,
    pub compiler: FakeCompiler,
    pub config: SupervisorConfig,
    pub dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(|config| config)
    }

    pub fn with_config(customize: impl FnOnce(SupervisorConfig) -> SupervisorConfig) -> Self {
        let dir = tempdir().unwrap();
        let config = customize(
            SupervisorConfig::new()
                .with_artifact_root(dir.path().join("repository"))
                .with_logs(dir.path().join("out.log"), dir.path().join("err.log")),
        );

        let spawner = FakeSpawner::default();
        let rpc = FakeConnector::default();
        let compiler = FakeCompiler::default();
        let supervisor = LifecycleSupervisor::new(
            config.clone(),
            Box::new(compiler.clone()),
            Box::new(spawner.clone()),
            Box::new(rpc.clone()),
        );

        Self {
            supervisor,
            spawner,
            rpc,
            compiler,
            config,
            dir,
        }
    }

    /// A second supervisor over the same repository, as after a restart.
    pub fn fresh_supervisor(&self) -> LifecycleSupervisor {
        LifecycleSupervisor::new(
            self.config.clone(),
            Box::new(FakeCompiler::default()),
            Box::new(FakeSpawner::default()),
            Box::new(FakeConnector::default()),
        )
    }
}
