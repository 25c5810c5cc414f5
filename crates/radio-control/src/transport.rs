//! Transport seam for remote procedure calls.

use radio_models::ParamValue;

use crate::error::Result;

/// A connected RPC client.
pub trait RpcClient: Send {
    /// Calls `method` with positional `args` and returns its result.
    fn call(&mut self, method: &str, args: &[ParamValue]) -> Result<ParamValue>;
}

/// Opens RPC clients to control endpoints.
pub trait RpcConnector: Send + Sync {
    /// Connects to the endpoint at `host:port`.
    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn RpcClient>>;
}
