//! Recursive directory analysis.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use derive_builder::Builder;
use jwalk::WalkDir;
use serde::{Deserialize, Serialize};

use fencebox_core::{resolve, LogLevel, OpError, ProgressSink, SandboxConfig};

/// Default cap on the number of entries returned in a listing.
pub const DEFAULT_LISTING_CAP: usize = 50;

/// Default number of files between progress ticks within one directory
/// level.
pub const DEFAULT_PROGRESS_EVERY: usize = 10;

/// Configuration for folder analysis.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct AnalyzeConfig {
    /// Maximum number of entries returned in `files`. Totals are never
    /// capped.
    #[builder(default = "DEFAULT_LISTING_CAP")]
    #[serde(default = "default_listing_cap")]
    pub listing_cap: usize,

    /// Emit a progress tick every this many files within a directory
    /// level.
    #[builder(default = "DEFAULT_PROGRESS_EVERY")]
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

fn default_listing_cap() -> usize {
    DEFAULT_LISTING_CAP
}

fn default_progress_every() -> usize {
    DEFAULT_PROGRESS_EVERY
}

impl AnalyzeConfig {
    /// Create a new analyze config builder.
    pub fn builder() -> AnalyzeConfigBuilder {
        AnalyzeConfigBuilder::default()
    }
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            listing_cap: DEFAULT_LISTING_CAP,
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

/// Metadata for one regular file found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    /// File name (not full path).
    pub name: CompactString,
    /// Path relative to the sandbox root.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

/// Aggregated outcome of a folder analysis.
///
/// `file_count` and `total_size` always reflect the full walk, even when
/// `files` is truncated to the listing cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Total number of regular files under the analyzed directory.
    pub file_count: u64,
    /// Sum of their sizes in bytes.
    pub total_size: u64,
    /// Per-file metadata in traversal order, truncated to the cap.
    pub files: Vec<FileMetadata>,
    /// Whether `files` was truncated.
    pub truncated: bool,
}

/// Recursive folder analyzer.
#[derive(Debug, Default)]
pub struct FolderAnalyzer {
    config: AnalyzeConfig,
}

impl FolderAnalyzer {
    /// Create an analyzer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with the given settings.
    pub fn with_config(config: AnalyzeConfig) -> Self {
        Self { config }
    }

    /// Analyze a sandbox-confined directory.
    ///
    /// Walks the directory recursively and accumulates totals over every
    /// regular file encountered; symlinks are never followed. Unreadable
    /// children are skipped and surfaced as warning-level sink messages.
    /// Progress is best-effort and never drives control flow.
    pub fn analyze(
        &self,
        sandbox: &SandboxConfig,
        path: &str,
        sink: &dyn ProgressSink,
    ) -> Result<AnalysisResult, OpError> {
        sink.log(LogLevel::Info, &format!("Analyzing folder: {path}"));
        tracing::debug!(path, "folder analysis requested");

        let resolved = resolve(sandbox, path).map_err(|e| report(sink, e))?;

        let metadata =
            fs::metadata(resolved.as_path()).map_err(|e| report(sink, OpError::io(path, e)))?;
        if !metadata.is_dir() {
            return Err(report(
                sink,
                OpError::NotADirectory {
                    path: PathBuf::from(path),
                },
            ));
        }

        sink.tick(0, 100);

        let mut by_parent = self.collect_entries(resolved.as_path(), sink);
        let mut walk = Walk::default();
        self.aggregate_level(resolved.as_path(), sandbox.root(), &mut by_parent, &mut walk, sink);

        sink.tick(100, 100);

        let truncated = walk.file_count > self.config.listing_cap as u64;
        let mut files = walk.files;
        files.truncate(self.config.listing_cap);

        Ok(AnalysisResult {
            file_count: walk.file_count,
            total_size: walk.total_size,
            files,
            truncated,
        })
    }

    /// Walk the directory and group entries by parent.
    fn collect_entries(
        &self,
        root: &Path,
        sink: &dyn ProgressSink,
    ) -> HashMap<PathBuf, Vec<EntryInfo>> {
        let walker = WalkDir::new(root)
            .sort(true)
            .skip_hidden(false)
            .follow_links(false);

        let mut by_parent: HashMap<PathBuf, Vec<EntryInfo>> = HashMap::new();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable entry");
                    sink.log(LogLevel::Warning, &format!("Skipping entry: {err}"));
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let path = entry.path();
            let Some(parent) = path.parent().map(Path::to_path_buf) else {
                continue;
            };
            let name = CompactString::new(entry.file_name().to_string_lossy());

            let file_type = entry.file_type();
            if file_type.is_dir() {
                by_parent.entry(parent).or_default().push(EntryInfo {
                    name,
                    path,
                    size: 0,
                    modified: std::time::UNIX_EPOCH,
                    is_dir: true,
                });
            } else if file_type.is_file() {
                let metadata = match entry.metadata() {
                    Ok(m) => m,
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "metadata unavailable");
                        sink.log(
                            LogLevel::Warning,
                            &format!("Skipping {}: {err}", path.display()),
                        );
                        continue;
                    }
                };
                by_parent.entry(parent).or_default().push(EntryInfo {
                    name,
                    path,
                    size: metadata.len(),
                    modified: metadata.modified().unwrap_or(std::time::UNIX_EPOCH),
                    is_dir: false,
                });
            }
            // Symlinks and other node types are not counted.
        }

        by_parent
    }

    /// Aggregate one directory level, then recurse into its
    /// subdirectories.
    fn aggregate_level(
        &self,
        dir: &Path,
        root: &Path,
        by_parent: &mut HashMap<PathBuf, Vec<EntryInfo>>,
        walk: &mut Walk,
        sink: &dyn ProgressSink,
    ) {
        let entries = by_parent.remove(dir).unwrap_or_default();
        let level_files = entries.iter().filter(|e| !e.is_dir).count();

        let mut processed = 0usize;
        for entry in &entries {
            if entry.is_dir {
                continue;
            }

            walk.file_count += 1;
            walk.total_size += entry.size;
            walk.files.push(FileMetadata {
                name: entry.name.clone(),
                path: entry
                    .path
                    .strip_prefix(root)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| entry.path.clone()),
                size: entry.size,
                modified: DateTime::<Utc>::from(entry.modified),
            });

            processed += 1;
            if self.config.progress_every > 0 && processed % self.config.progress_every == 0 {
                let scaled = (processed * 90 / level_files).min(90) as u64;
                sink.tick(scaled, 100);
            }
        }

        for entry in entries {
            if entry.is_dir {
                self.aggregate_level(&entry.path, root, by_parent, walk, sink);
            }
        }
    }
}

/// Running totals during a walk.
#[derive(Debug, Default)]
struct Walk {
    file_count: u64,
    total_size: u64,
    files: Vec<FileMetadata>,
}

/// Collected per-entry information, grouped by parent directory.
#[derive(Debug)]
struct EntryInfo {
    name: CompactString,
    path: PathBuf,
    size: u64,
    modified: std::time::SystemTime,
    is_dir: bool,
}

/// Report a failure through the sink before returning it.
fn report(sink: &dyn ProgressSink, err: OpError) -> OpError {
    sink.log(LogLevel::Error, &err.to_string());
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use fencebox_core::NullSink;
    use tempfile::TempDir;

    fn sandbox() -> (TempDir, SandboxConfig) {
        let temp = TempDir::new().unwrap();
        let config = SandboxConfig::open(temp.path(), 1024).unwrap();
        (temp, config)
    }

    #[test]
    fn test_analyze_counts_nested_files() {
        let (_temp, config) = sandbox();
        let root = config.root();
        fs::create_dir_all(root.join("docs/drafts")).unwrap();
        fs::write(root.join("docs/a.txt"), "hello").unwrap();
        fs::write(root.join("docs/b.txt"), "wo").unwrap();
        fs::write(root.join("docs/drafts/c.txt"), "x").unwrap();

        let result = FolderAnalyzer::new()
            .analyze(&config, "docs", &NullSink)
            .unwrap();

        assert_eq!(result.file_count, 3);
        assert_eq!(result.total_size, 5 + 2 + 1);
        assert_eq!(result.files.len(), 3);
        assert!(!result.truncated);
    }

    #[test]
    fn test_paths_are_relative_to_sandbox_root() {
        let (_temp, config) = sandbox();
        fs::create_dir_all(config.root().join("docs")).unwrap();
        fs::write(config.root().join("docs/a.txt"), "x").unwrap();

        let result = FolderAnalyzer::new()
            .analyze(&config, "docs", &NullSink)
            .unwrap();

        assert_eq!(result.files[0].path, PathBuf::from("docs/a.txt"));
        assert_eq!(result.files[0].name.as_str(), "a.txt");
    }

    #[test]
    fn test_analyze_empty_directory() {
        let (_temp, config) = sandbox();
        fs::create_dir(config.root().join("empty")).unwrap();

        let result = FolderAnalyzer::new()
            .analyze(&config, "empty", &NullSink)
            .unwrap();

        assert_eq!(result.file_count, 0);
        assert_eq!(result.total_size, 0);
        assert!(result.files.is_empty());
        assert!(!result.truncated);
    }

    #[test]
    fn test_analyze_missing_directory() {
        let (_temp, config) = sandbox();

        let err = FolderAnalyzer::new()
            .analyze(&config, "nowhere", &NullSink)
            .unwrap_err();
        assert!(matches!(err, OpError::NotFound { .. }));
    }

    #[test]
    fn test_analyze_file_is_not_a_directory() {
        let (_temp, config) = sandbox();
        fs::write(config.root().join("plain.txt"), "x").unwrap();

        let err = FolderAnalyzer::new()
            .analyze(&config, "plain.txt", &NullSink)
            .unwrap_err();
        assert!(matches!(err, OpError::NotADirectory { .. }));
    }

    #[test]
    fn test_analyze_escape_is_violation() {
        let (_temp, config) = sandbox();

        let err = FolderAnalyzer::new()
            .analyze(&config, "../..", &NullSink)
            .unwrap_err();
        assert!(matches!(err, OpError::PathViolation { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_counted() {
        let (_temp, config) = sandbox();
        let root = config.root();
        fs::create_dir(root.join("dir")).unwrap();
        fs::write(root.join("dir/real.txt"), "abc").unwrap();
        std::os::unix::fs::symlink(root.join("dir/real.txt"), root.join("dir/alias.txt")).unwrap();

        let result = FolderAnalyzer::new()
            .analyze(&config, "dir", &NullSink)
            .unwrap();

        assert_eq!(result.file_count, 1);
        assert_eq!(result.total_size, 3);
    }
}
