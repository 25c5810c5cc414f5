//! Cached control connection with parameter helpers.

use std::collections::HashMap;
use std::fmt;

use radio_models::ParamValue;
use tracing::{debug, error, info};

use crate::error::{RemoteError, Result};
use crate::transport::{RpcClient, RpcConnector};

const SETTER_PREFIX: &str = "set_";
const GETTER_PREFIX: &str = "get_";
const STOP_METHOD: &str = "stop";
const WAIT_METHOD: &str = "wait";

/// A parameter that could not be read or written.
#[derive(Debug)]
pub struct ParameterFailure {
    /// Parameter name.
    pub key: String,
    /// Why the call failed.
    pub error: RemoteError,
}

/// Lazily-opened, cached connection to a program's control endpoint.
pub struct ControlChannel {
    connector: Box<dyn RpcConnector>,
    host: String,
    client: Option<Box<dyn RpcClient>>,
    port: Option<u16>,
}

impl fmt::Debug for ControlChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlChannel")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("connected", &self.client.is_some())
            .finish()
    }
}

impl ControlChannel {
    /// Creates a disconnected channel that will reach programs on `host`.
    pub fn new(connector: Box<dyn RpcConnector>, host: impl Into<String>) -> Self {
        Self {
            connector,
            host: host.into(),
            client: None,
            port: None,
        }
    }

    /// Host control endpoints are reached on.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port of the current connection.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns true if a connection is cached.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Connects to the endpoint on `port`, reusing an existing connection.
    pub fn connect(&mut self, port: u16) -> Result<()> {
        if self.client.is_some() {
            debug!(port = ?self.port, "already connected to control endpoint");
            return Ok(());
        }

        match self.connector.connect(&self.host, port) {
            Ok(client) => {
                info!(host = %self.host, port = port, "connected to control endpoint");
                self.client = Some(client);
                self.port = Some(port);
                Ok(())
            }
            Err(e) => {
                error!(host = %self.host, port = port, error = %e, "failed to connect to control endpoint");
                Err(e)
            }
        }
    }

    /// Drops the cached connection.
    pub fn close(&mut self) {
        if self.client.take().is_some() {
            debug!(port = ?self.port, "control channel closed");
        }
        self.port = None;
    }

    /// Calls `method` on the connected endpoint.
    pub fn invoke(&mut self, method: &str, args: &[ParamValue]) -> Result<ParamValue> {
        let client = self.client.as_mut().ok_or(RemoteError::NotConnected)?;
        debug!(method = %method, args = args.len(), "invoking remote method");
        client.call(method, args)
    }

    /// Writes one parameter through its `set_<key>` method.
    pub fn set_parameter(&mut self, key: &str, value: ParamValue) -> Result<()> {
        self.invoke(&format!("{}{}", SETTER_PREFIX, key), &[value])?;
        Ok(())
    }

    /// Reads one parameter through its `get_<key>` method.
    pub fn get_parameter(&mut self, key: &str) -> Result<ParamValue> {
        self.invoke(&format!("{}{}", GETTER_PREFIX, key), &[])
    }

    /// Writes every parameter in `params`, in key order.
    ///
    /// A failing key is logged and skipped; keys already written stay
    /// written. Returns the failures.
    pub fn set_parameters(&mut self, params: &HashMap<String, ParamValue>) -> Vec<ParameterFailure> {
        let mut keys: Vec<&String> = params.keys().collect();
        keys.sort();

        let mut failures = Vec::new();
        for key in keys {
            if let Err(error) = self.set_parameter(key, params[key].clone()) {
                error!(key = %key, error = %error, "failed to set parameter");
                failures.push(ParameterFailure {
                    key: key.clone(),
                    error,
                });
            }
        }
        failures
    }

    /// Reads every key in `keys`.
    ///
    /// Keys that fail are left out of the returned map and reported as
    /// failures.
    pub fn get_parameters(
        &mut self,
        keys: &[String],
    ) -> (HashMap<String, ParamValue>, Vec<ParameterFailure>) {
        let mut values = HashMap::new();
        let mut failures = Vec::new();

        for key in keys {
            debug!(key = %key, "probing parameter");
            match self.get_parameter(key) {
                Ok(value) => {
                    values.insert(key.clone(), value);
                }
                Err(error) => {
                    error!(key = %key, error = %error, "failed to get parameter");
                    failures.push(ParameterFailure {
                        key: key.clone(),
                        error,
                    });
                }
            }
        }
        (values, failures)
    }

    /// Asks the program to stop its flowgraph and blocks until it has.
    pub fn stop_and_wait(&mut self) -> Result<()> {
        self.invoke(STOP_METHOD, &[])?;
        self.invoke(WAIT_METHOD, &[])?;
        Ok(())
    }
}
