//! Activation requests.

use radio_models::SourceFormat;

use crate::error::{Result, SupervisorError};

/// Everything needed to activate a program.
#[derive(Debug, Clone)]
pub struct ActivationRequest {
    /// Program name; also the artifact base name.
    pub name: String,
    /// Program source: a flowgraph or runnable program text.
    pub source: String,
    /// Arguments passed to the program on start.
    pub args: Vec<String>,
    /// Format of `source`.
    pub format: SourceFormat,
    /// Control port; the configured default is used when absent.
    pub port: Option<u16>,
}

impl ActivationRequest {
    /// Creates a request with no arguments and the default port.
    pub fn new(name: impl Into<String>, source: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            args: Vec::new(),
            format,
            port: None,
        }
    }

    /// Creates a request from a format tag such as `"grc"` or
    /// `"native-executable"`.
    ///
    /// # Errors
    ///
    /// Returns `SupervisorError::Validation` for an unknown tag.
    pub fn from_tag(
        name: impl Into<String>,
        source: impl Into<String>,
        tag: &str,
    ) -> Result<Self> {
        let format = tag
            .parse::<SourceFormat>()
            .map_err(|e| SupervisorError::Validation(e.to_string()))?;
        Ok(Self::new(name, source, format))
    }

    /// Sets the program arguments.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Sets the control port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Checks that the request can be acted on.
    pub fn validate(&self) -> Result<()> {
        let name = self.name.as_str();
        if name.trim().is_empty() {
            return Err(SupervisorError::Validation(
                "program name must not be empty".to_string(),
            ));
        }
        if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
            return Err(SupervisorError::Validation(format!(
                "program name '{}' must not contain path separators",
                name
            )));
        }
        if self.port == Some(0) {
            return Err(SupervisorError::Validation(
                "control port must not be 0".to_string(),
            ));
        }
        Ok(())
    }
}
