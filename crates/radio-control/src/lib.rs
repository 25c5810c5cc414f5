//! Remote control channel to running radio programs.
//!
//! A running radio program exposes its runtime parameters through an RPC
//! endpoint with one `get_<name>`/`set_<name>` method pair per parameter,
//! plus `stop`/`wait` to halt its flowgraph. This crate provides:
//! - `RpcConnector` / `RpcClient` - the transport seam (the wire protocol
//!   lives outside this crate)
//! - `ControlChannel` - a cached connection with parameter helpers
//!
//! # Example
//!
//! ```ignore
//! use std::collections::HashMap;
//! use radio_control::ControlChannel;
//!
//! let mut channel = ControlChannel::new(Box::new(my_connector), "localhost");
//! channel.connect(1235)?;
//!
//! let mut params = HashMap::new();
//! params.insert("freq".to_string(), serde_json::json!(98.5e6));
//! for failure in channel.set_parameters(&params) {
//!     eprintln!("{}: {}", failure.key, failure.error);
//! }
//! ```

pub mod channel;
pub mod error;
pub mod transport;

pub use channel::{ControlChannel, ParameterFailure};
pub use error::{RemoteError, Result};
pub use transport::{RpcClient, RpcConnector};
