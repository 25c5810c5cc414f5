//! Core data models for the radio program supervisor.
//!
//! This crate provides the types shared by every supervisor component:
//! the immutable launch spec of a registered program, its source format,
//! and the lifecycle state of the supervised session.

pub mod program;
pub mod state;

pub use program::{FormatParseError, ProgramRegistration, SourceFormat};
pub use state::ProgramState;

/// Value of a runtime parameter exchanged with a radio program.
pub type ParamValue = serde_json::Value;
