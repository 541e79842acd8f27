//! Write operation.

use std::fs;

use fencebox_core::{resolve, LogLevel, OpError, ProgressSink, SandboxConfig};

use crate::fail;

/// Write text content to a sandboxed file, overwriting any previous
/// contents.
///
/// Content is required: `None` or an empty string is a validation
/// failure, not a zero-byte write. Missing intermediate directories are
/// created, but only inside the resolved path's parent chain — the parent
/// of a confined path is itself confined. There is no size limit on
/// write; only reads are bounded.
pub fn write_file(
    config: &SandboxConfig,
    path: &str,
    content: Option<&str>,
    sink: &dyn ProgressSink,
) -> Result<(), OpError> {
    sink.log(LogLevel::Info, &format!("Writing file: {path}"));
    tracing::debug!(path, "file write requested");

    let content = match content {
        Some(c) if !c.is_empty() => c,
        _ => {
            return Err(fail(
                sink,
                OpError::validation("Content is required for file write"),
            ));
        }
    };

    let resolved = resolve(config, path).map_err(|e| fail(sink, e))?;

    if let Some(parent) = resolved.as_path().parent() {
        fs::create_dir_all(parent).map_err(|e| fail(sink, OpError::io(path, e)))?;
    }

    sink.tick(50, 100);
    fs::write(resolved.as_path(), content).map_err(|e| fail(sink, OpError::io(path, e)))?;
    sink.tick(100, 100);

    Ok(())
}
