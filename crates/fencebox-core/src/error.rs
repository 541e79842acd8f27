//! Error types for sandboxed file operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during a sandboxed operation.
///
/// Every failure is a typed, caller-visible value; nothing here ever
/// panics the process. Path fields carry the caller-supplied relative
/// path, so the sandbox location is never echoed back to remote callers.
#[derive(Debug, Error)]
pub enum OpError {
    /// The resolved path escapes the sandbox root.
    #[error("Access outside allowed directory: {path}")]
    PathViolation { path: PathBuf },

    /// Path not found.
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// Path exists but is not a regular file.
    #[error("Path is not a file: {path}")]
    NotAFile { path: PathBuf },

    /// Path exists but is not a directory.
    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// File exceeds the configured size limit.
    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    /// The request itself was invalid (e.g. missing required content).
    #[error("{message}")]
    Validation { message: String },

    /// Unexpected underlying I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OpError {
    /// Create an I/O error with path context.
    ///
    /// A missing path is classified into the typed `NotFound` variant;
    /// everything else stays a generic I/O failure.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// The stable discriminant for this error, used at the invocation
    /// boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PathViolation { .. } => ErrorKind::PathViolation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotAFile { .. } => ErrorKind::NotAFile,
            Self::NotADirectory { .. } => ErrorKind::NotADirectory,
            Self::TooLarge { .. } => ErrorKind::TooLarge,
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::Io { .. } => ErrorKind::IoFailure,
        }
    }
}

/// Kind of operation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Resolved path escapes the sandbox root.
    PathViolation,
    /// Path not found.
    NotFound,
    /// Path is not a regular file.
    NotAFile,
    /// Path is not a directory.
    NotADirectory,
    /// File exceeds the size limit.
    TooLarge,
    /// Invalid request.
    ValidationError,
    /// Underlying I/O error.
    IoFailure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::PathViolation => "path_violation",
            Self::NotFound => "not_found",
            Self::NotAFile => "not_a_file",
            Self::NotADirectory => "not_a_directory",
            Self::TooLarge => "too_large",
            Self::ValidationError => "validation_error",
            Self::IoFailure => "io_failure",
        };
        write!(f, "{name}")
    }
}
