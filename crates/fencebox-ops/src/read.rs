//! Read operation.

use std::fs;
use std::path::PathBuf;

use fencebox_core::{resolve, LogLevel, OpError, ProgressSink, SandboxConfig};

use crate::fail;

/// Read the full contents of a sandboxed file as text.
///
/// The path is confined to the sandbox root before anything touches the
/// filesystem. A missing path is `NotFound`, a directory is `NotAFile`,
/// and a file larger than the configured limit is `TooLarge` — a file of
/// exactly the limit is allowed. The size check and the read are not
/// atomic; the file may change in between (accepted TOCTOU window).
pub fn read_file(
    config: &SandboxConfig,
    path: &str,
    sink: &dyn ProgressSink,
) -> Result<String, OpError> {
    sink.log(LogLevel::Info, &format!("Reading file: {path}"));
    tracing::debug!(path, "file read requested");

    let resolved = resolve(config, path).map_err(|e| fail(sink, e))?;

    let metadata = fs::metadata(resolved.as_path()).map_err(|e| fail(sink, OpError::io(path, e)))?;
    if !metadata.is_file() {
        return Err(fail(
            sink,
            OpError::NotAFile {
                path: PathBuf::from(path),
            },
        ));
    }

    let size = metadata.len();
    if size > config.max_file_size() {
        return Err(fail(
            sink,
            OpError::TooLarge {
                path: PathBuf::from(path),
                size,
                limit: config.max_file_size(),
            },
        ));
    }

    sink.tick(50, 100);
    let content =
        fs::read_to_string(resolved.as_path()).map_err(|e| fail(sink, OpError::io(path, e)))?;
    sink.tick(100, 100);

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fencebox_core::NullSink;
    use tempfile::TempDir;

    fn sandbox(limit: u64) -> (TempDir, SandboxConfig) {
        let temp = TempDir::new().unwrap();
        let config = SandboxConfig::open(temp.path(), limit).unwrap();
        (temp, config)
    }

    #[test]
    fn test_read_returns_contents() {
        let (_temp, config) = sandbox(1024);
        fs::write(config.root().join("a.txt"), "hello").unwrap();

        let content = read_file(&config, "a.txt", &NullSink).unwrap();
        assert_eq!(content, "hello");
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let (_temp, config) = sandbox(1024);

        let err = read_file(&config, "missing.txt", &NullSink).unwrap_err();
        assert!(matches!(err, OpError::NotFound { .. }));
    }

    #[test]
    fn test_read_directory_is_not_a_file() {
        let (_temp, config) = sandbox(1024);
        fs::create_dir(config.root().join("subdir")).unwrap();

        let err = read_file(&config, "subdir", &NullSink).unwrap_err();
        assert!(matches!(err, OpError::NotAFile { .. }));
    }

    #[test]
    fn test_read_size_boundary() {
        let (_temp, config) = sandbox(4);
        fs::write(config.root().join("exact.txt"), "abcd").unwrap();
        fs::write(config.root().join("over.txt"), "abcde").unwrap();

        // Exactly the limit succeeds.
        assert_eq!(read_file(&config, "exact.txt", &NullSink).unwrap(), "abcd");

        // One byte over fails.
        let err = read_file(&config, "over.txt", &NullSink).unwrap_err();
        match err {
            OpError::TooLarge { size, limit, .. } => {
                assert_eq!(size, 5);
                assert_eq!(limit, 4);
            }
            other => panic!("expected TooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_read_escape_is_violation() {
        let (_temp, config) = sandbox(1024);

        let err = read_file(&config, "../etc/passwd", &NullSink).unwrap_err();
        assert!(matches!(err, OpError::PathViolation { .. }));
    }
}
