//! Progress reporting seam.

use serde::{Deserialize, Serialize};

/// Severity of a sink log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One-way notification interface for operation progress.
///
/// Operations call `tick` and `log` synchronously but never depend on
/// delivery: an implementation must swallow its own failures, and the
/// caller neither blocks nor retries on a tick. Progress is user-visible
/// reporting only — never control flow.
pub trait ProgressSink: Send + Sync {
    /// Report discrete progress, `current` out of `total`.
    fn tick(&self, current: u64, total: u64);

    /// Report a leveled text message.
    fn log(&self, level: LogLevel, message: &str);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn tick(&self, _current: u64, _total: u64) {}

    fn log(&self, _level: LogLevel, _message: &str) {}
}
