//! Lifecycle supervision for radio programs.
//!
//! This crate ties the other radio crates together:
//! - `LifecycleSupervisor` - sequences compile, register, start, pause,
//!   resume and stop for at most one active program
//! - `ActivationRequest` - what a host asks to activate
//! - `SupervisorConfig` - control host, default port, artifact and log paths
//! - `SupervisorEvent` - broadcast to subscribers on every transition
//!
//! # Example
//!
//! ```ignore
//! use radio_compiler::GrccCompiler;
//! use radio_models::SourceFormat;
//! use radio_process::CommandSpawner;
//! use radio_runtime::{ActivationRequest, LifecycleSupervisor, SupervisorConfig};
//!
//! let config = SupervisorConfig::default();
//! let spawner = CommandSpawner::new(config.launcher.clone());
//! let mut supervisor = LifecycleSupervisor::new(
//!     config,
//!     Box::new(GrccCompiler::new()?),
//!     Box::new(spawner),
//!     Box::new(my_connector),
//! );
//!
//! let request = ActivationRequest::new("fm_receiver", flowgraph_xml, SourceFormat::CompiledFlowgraph)
//!     .with_port(1235);
//! assert_eq!(supervisor.activate(request), Some(true));
//!
//! supervisor.deactivate("fm_receiver", true); // pause
//! supervisor.deactivate("fm_receiver", false); // stop and remove
//! ```
//!
//! # States
//!
//! ```text
//! Inactive --activate--> Running --deactivate(pause)--> Paused
//!    ^                      ^                             |
//!    |                      +--------activate(same)-------+
//!    +------deactivate(stop) from Running or Paused-------+
//! ```
//!
//! Host-facing operations never return errors: rejected requests are logged
//! and reported through their return value. The `try_*` variants return the
//! underlying `SupervisorError` instead.

pub mod config;
pub mod error;
pub mod event;
pub mod paths;
pub mod request;
pub mod supervisor;

#[cfg(test)]
mod testing;

pub use config::{SupervisorConfig, DEFAULT_CONTROL_HOST, DEFAULT_CONTROL_PORT};
pub use error::{Result, SupervisorError};
pub use event::SupervisorEvent;
pub use request::ActivationRequest;
pub use supervisor::{Activation, Deactivation, LifecycleSupervisor, SharedSupervisor};
