//! Artifact repository for radio programs.
//!
//! One file per artifact, keyed by program name, under a single root
//! directory that is created on first write:
//!
//! ```text
//! root/
//! ├── fm_receiver.py     # runnable artifact
//! ├── fm_receiver.grc    # flowgraph source (compiled programs only)
//! └── fm_receiver.json   # serialized registration
//! ```
//!
//! All writes go through a temp file and a rename so a crash never leaves a
//! half-written artifact behind.
//!
//! # Example
//!
//! ```no_run
//! use radio_store::{ArtifactKind, ArtifactStore};
//!
//! let store = ArtifactStore::new("/home/user/.wishful/radio");
//! let path = store.put("fm_receiver", ArtifactKind::Executable, "print('hi')").unwrap();
//! assert!(path.exists());
//!
//! store.remove("fm_receiver").unwrap();
//! // Removing again is not an error.
//! store.remove("fm_receiver").unwrap();
//! ```

pub mod artifact_store;
pub mod atomic;
pub mod error;

pub use artifact_store::{ArtifactKind, ArtifactStore};
pub use error::{Result, StoreError};
