//! radio CLI library.
//!
//! Command-line host for the lifecycle supervisor: runs one program in the
//! foreground, and manages the artifact repository.

pub mod cli;
pub mod commands;
