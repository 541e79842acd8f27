//! Recursive folder analysis for fencebox.
//!
//! Walks a sandbox-confined directory, aggregates per-file metadata and
//! totals, and returns a listing truncated to a fixed cap. The totals
//! always reflect the full walk — callers must not infer them from the
//! truncated listing length.
//!
//! ```rust,ignore
//! use fencebox_analyze::FolderAnalyzer;
//! use fencebox_core::{NullSink, SandboxConfig};
//!
//! let config = SandboxConfig::with_default_limit("/srv/sandbox")?;
//! let result = FolderAnalyzer::new().analyze(&config, "reports", &NullSink)?;
//!
//! println!("{} files, {} bytes", result.file_count, result.total_size);
//! if result.truncated {
//!     println!("listing capped at {} entries", result.files.len());
//! }
//! ```

mod analyzer;

pub use analyzer::{
    AnalysisResult, AnalyzeConfig, AnalyzeConfigBuilder, FileMetadata, FolderAnalyzer,
    DEFAULT_LISTING_CAP, DEFAULT_PROGRESS_EVERY,
};
