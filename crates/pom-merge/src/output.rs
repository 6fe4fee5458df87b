//! Writing the merge result.

use std::fs;
use std::io::Write;
use std::path::Path;

use pom_catalog::CONFLICT_DELIMITER;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{MergeError, MergeResult};

/// Replace `path` with `contents` in one step.
///
/// The text is written to a temporary file in the same directory, synced,
/// then renamed over `path`. If anything fails the temporary file is
/// removed and `path` is left as it was. An existing file's permissions are
/// carried over.
pub fn commit_atomically(path: &Path, contents: &str) -> MergeResult<()> {
    let io_error = |source| MergeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(contents.as_bytes()).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(file.path(), metadata.permissions()).map_err(io_error)?;
    }

    file.persist(path).map_err(|e| io_error(e.error))?;
    debug!(path = %path.display(), bytes = contents.len(), "committed output");
    Ok(())
}

/// Whether rendered catalog text still carries conflict markers.
///
/// A translation that legitimately contains the delimiter literal is
/// reported as a conflict too.
pub fn detect_conflicts(rendered: &str) -> bool {
    rendered.contains(CONFLICT_DELIMITER)
}
