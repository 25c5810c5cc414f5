//! Supervisor configuration.

use std::path::PathBuf;

use crate::paths;

/// Default host control endpoints are reached on.
pub const DEFAULT_CONTROL_HOST: &str = "localhost";

/// Default port of a program's control endpoint.
pub const DEFAULT_CONTROL_PORT: u16 = 1235;

/// Configuration for the lifecycle supervisor.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Host control endpoints are reached on.
    pub control_host: String,
    /// Control port used when an activation does not name one.
    pub default_port: u16,
    /// Directory artifacts are stored under.
    pub artifact_root: PathBuf,
    /// Log receiving program stdout.
    pub stdout_log: PathBuf,
    /// Log receiving program stderr.
    pub stderr_log: PathBuf,
    /// Command placed in front of an artifact to run it.
    pub launcher: Vec<String>,
    /// Refuse to resume a paused program whose process has exited.
    pub verify_on_resume: bool,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            control_host: DEFAULT_CONTROL_HOST.to_string(),
            default_port: DEFAULT_CONTROL_PORT,
            artifact_root: paths::artifact_root(),
            stdout_log: paths::stdout_log(),
            stderr_log: paths::stderr_log(),
            launcher: vec!["env".to_string(), "python3".to_string()],
            verify_on_resume: false,
        }
    }
}

impl SupervisorConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the control host.
    pub fn with_control_host(mut self, host: impl Into<String>) -> Self {
        self.control_host = host.into();
        self
    }

    /// Sets the default control port.
    pub fn with_default_port(mut self, port: u16) -> Self {
        self.default_port = port;
        self
    }

    /// Sets the artifact root directory.
    pub fn with_artifact_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.artifact_root = root.into();
        self
    }

    /// Sets both program output logs.
    pub fn with_logs(mut self, stdout: impl Into<PathBuf>, stderr: impl Into<PathBuf>) -> Self {
        self.stdout_log = stdout.into();
        self.stderr_log = stderr.into();
        self
    }

    /// Sets the launcher command.
    pub fn with_launcher(mut self, launcher: Vec<String>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Enables or disables the liveness check on resume.
    pub fn with_verify_on_resume(mut self, verify: bool) -> Self {
        self.verify_on_resume = verify;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SupervisorConfig::default();

        assert_eq!(config.control_host, "localhost");
        assert_eq!(config.default_port, 1235);
        assert_eq!(config.launcher, vec!["env".to_string(), "python3".to_string()]);
        assert!(!config.verify_on_resume);
        assert_eq!(config.stdout_log.file_name().unwrap(), "radio-program.log");
        assert_eq!(config.stderr_log.file_name().unwrap(), "radio-program-err.log");
    }

    #[test]
    fn test_config_builder() {
        let config = SupervisorConfig::new()
            .with_control_host("10.0.0.2")
            .with_default_port(5000)
            .with_artifact_root("/srv/radio")
            .with_logs("/var/log/out.log", "/var/log/err.log")
            .with_launcher(vec![])
            .with_verify_on_resume(true);

        assert_eq!(config.control_host, "10.0.0.2");
        assert_eq!(config.default_port, 5000);
        assert_eq!(config.artifact_root, PathBuf::from("/srv/radio"));
        assert_eq!(config.stdout_log, PathBuf::from("/var/log/out.log"));
        assert_eq!(config.stderr_log, PathBuf::from("/var/log/err.log"));
        assert!(config.launcher.is_empty());
        assert!(config.verify_on_resume);
    }
}
