//! Core types for fencebox.
//!
//! This crate provides the foundation the operation crates build on: the
//! sandbox configuration, the path-confinement resolver, the shared error
//! vocabulary, and the progress sink trait.

mod config;
mod error;
mod path;
mod progress;

pub use config::{SandboxConfig, DEFAULT_MAX_FILE_SIZE};
pub use error::{ErrorKind, OpError};
pub use path::{resolve, ResolvedPath};
pub use progress::{LogLevel, NullSink, ProgressSink};
