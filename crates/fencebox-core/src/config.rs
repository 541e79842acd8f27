//! Sandbox configuration.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::OpError;

/// Default limit for file reads: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Immutable, process-lifetime sandbox configuration.
///
/// Holds the canonicalized root directory all operations are confined to,
/// and the maximum file size a read will return. Constructed once at
/// startup and shared read-only (plain reference or `Arc`) with every
/// operation; it is never replaced or mutated afterwards.
///
/// Fields are private: a `SandboxConfig` in hand proves the root exists,
/// is a directory, and is fully canonicalized.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    root: PathBuf,
    max_file_size: u64,
}

impl SandboxConfig {
    /// Open a sandbox rooted at `root` with the given read-size limit.
    ///
    /// The root directory is created if absent, then canonicalized. A root
    /// that exists but is not a directory is rejected.
    pub fn open(root: impl Into<PathBuf>, max_file_size: u64) -> Result<Self, OpError> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(OpError::validation("Sandbox root path cannot be empty"));
        }

        if !root.exists() {
            fs::create_dir_all(&root).map_err(|e| OpError::io(&root, e))?;
        }

        let root = root.canonicalize().map_err(|e| OpError::io(&root, e))?;
        if !root.is_dir() {
            return Err(OpError::NotADirectory { path: root });
        }

        Ok(Self {
            root,
            max_file_size,
        })
    }

    /// Open a sandbox with the default read-size limit.
    pub fn with_default_limit(root: impl Into<PathBuf>) -> Result<Self, OpError> {
        Self::open(root, DEFAULT_MAX_FILE_SIZE)
    }

    /// The canonicalized sandbox root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maximum number of bytes a read operation will return.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_existing_root() {
        let temp = TempDir::new().unwrap();
        let config = SandboxConfig::open(temp.path(), 1024).unwrap();

        assert_eq!(config.root(), temp.path().canonicalize().unwrap());
        assert_eq!(config.max_file_size(), 1024);
    }

    #[test]
    fn test_open_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("to_be_created/nested");
        assert!(!root.exists());

        let config = SandboxConfig::with_default_limit(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(config.max_file_size(), DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_open_rejects_file_root() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        std::fs::write(&file, "not a directory").unwrap();

        let err = SandboxConfig::open(&file, 1024).unwrap_err();
        assert!(matches!(err, OpError::NotADirectory { .. }));
    }

    #[test]
    fn test_open_rejects_empty_root() {
        let err = SandboxConfig::open("", 1024).unwrap_err();
        assert!(matches!(err, OpError::Validation { .. }));
    }

    #[test]
    fn test_root_is_canonical() {
        let temp = TempDir::new().unwrap();
        let dotted = temp.path().join("a/..").join("a");
        std::fs::create_dir_all(temp.path().join("a")).unwrap();

        let config = SandboxConfig::open(&dotted, 1024).unwrap();
        assert_eq!(
            config.root(),
            temp.path().join("a").canonicalize().unwrap()
        );
    }
}
