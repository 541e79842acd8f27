//! Structured request and reply types for the invocation boundary.
//!
//! The surrounding tool layer owns the wire framing; these enums define
//! the operation names and typed fields it carries in and out.

use fencebox_analyze::AnalysisResult;
use fencebox_core::{ErrorKind, OpError};
use serde::{Deserialize, Serialize};

/// A file operation requested by a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FolderRequest {
    /// Read a file's contents.
    FileRead { path: String },
    /// Write content to a file, creating parents as needed.
    FileWrite {
        path: String,
        #[serde(default)]
        content: Option<String>,
    },
    /// Delete a single file.
    FileDelete { path: String },
    /// Recursively analyze a directory.
    FolderAnalysis { path: String },
}

impl FolderRequest {
    /// Create a read request.
    pub fn read(path: impl Into<String>) -> Self {
        Self::FileRead { path: path.into() }
    }

    /// Create a write request.
    pub fn write(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::FileWrite {
            path: path.into(),
            content: Some(content.into()),
        }
    }

    /// Create a delete request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::FileDelete { path: path.into() }
    }

    /// Create a folder analysis request.
    pub fn analysis(path: impl Into<String>) -> Self {
        Self::FolderAnalysis { path: path.into() }
    }

    /// The caller-supplied relative path of this request.
    pub fn path(&self) -> &str {
        match self {
            Self::FileRead { path }
            | Self::FileWrite { path, .. }
            | Self::FileDelete { path }
            | Self::FolderAnalysis { path } => path,
        }
    }
}

/// Successful outcome of a request, echoing the relative path back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OperationReply {
    /// File contents.
    FileRead { path: String, content: String },
    /// File written.
    FileWritten { path: String, message: String },
    /// File deleted.
    FileDeleted { path: String, message: String },
    /// Directory analysis.
    FolderAnalysis {
        path: String,
        #[serde(flatten)]
        analysis: AnalysisResult,
    },
}

impl OperationReply {
    /// The relative path this reply refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::FileRead { path, .. }
            | Self::FileWritten { path, .. }
            | Self::FileDeleted { path, .. }
            | Self::FolderAnalysis { path, .. } => path,
        }
    }
}

/// Caller-visible failure: stable kind plus human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<OpError> for OperationFailure {
    fn from(err: OpError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
