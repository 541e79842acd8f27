//! Delete operation.

use std::fs;
use std::path::PathBuf;

use fencebox_core::{resolve, LogLevel, OpError, ProgressSink, SandboxConfig};

use crate::fail;

/// Delete a single sandboxed file.
///
/// A missing path is `NotFound` and a directory is `NotAFile` —
/// directories are never deleted by this operation, and there is no
/// recursive removal.
pub fn delete_file(
    config: &SandboxConfig,
    path: &str,
    sink: &dyn ProgressSink,
) -> Result<(), OpError> {
    sink.log(LogLevel::Info, &format!("Deleting file: {path}"));
    tracing::debug!(path, "file delete requested");

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

    sink.tick(50, 100);
    fs::remove_file(resolved.as_path()).map_err(|e| fail(sink, OpError::io(path, e)))?;
    sink.tick(100, 100);

    Ok(())
}
