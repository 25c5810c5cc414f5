//! Flowgraph compiler adapters.
//!
//! A flowgraph is a declarative program definition that has to be compiled
//! into a runnable program before the supervisor can launch it. This crate
//! provides:
//! - `FlowgraphCompiler` - the seam the supervisor compiles through
//! - `GrccCompiler` - drives the external `grcc` tool
//! - `flowgraph::rewrite_id` - renames a flowgraph so its output file is
//!   named after the program
//!
//! # Example
//!
//! ```no_run
//! use radio_compiler::{FlowgraphCompiler, GrccCompiler};
//!
//! let compiler = GrccCompiler::new().expect("grcc not found");
//! let source = std::fs::read_to_string("fm_receiver.grc").unwrap();
//! let program = compiler.compile("fm_receiver", &source).unwrap();
//! println!("{}", program);
//! ```

pub mod error;
pub mod flowgraph;
pub mod grcc;
pub mod traits;

pub use error::{CompileError, Result};
pub use grcc::GrccCompiler;
pub use traits::FlowgraphCompiler;
