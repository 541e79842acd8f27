//! Sandboxed file operations engine for fencebox.
//!
//! This crate provides the read/write/delete operations built on the
//! path-confinement guarantee of `fencebox-core`, the structured
//! request/reply types of the invocation boundary, and an async executor
//! that streams progress events through channels, following the same
//! pattern as the folder analyzer.

mod delete;
mod executor;
mod progress;
mod read;
mod request;
mod write;

pub use delete::delete_file;
pub use executor::Executor;
pub use progress::{ChannelSink, OperationEvent};
pub use read::read_file;
pub use request::{FolderRequest, OperationFailure, OperationReply};
pub use write::write_file;

// Re-export the sink seam so callers need only this crate.
pub use fencebox_core::{LogLevel, NullSink, ProgressSink};

/// Default channel buffer size for operation event streams.
pub const OPERATION_CHANNEL_SIZE: usize = 100;

pub(crate) use progress::fail;
