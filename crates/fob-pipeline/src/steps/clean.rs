use crate::error::{CliError, Result};
use std::fs;
use std::path::Path;

/// Remove everything below `out_dir`, keeping the directory itself.
///
/// A missing directory is left missing.
pub fn clean(out_dir: &Path) -> Result<usize> {
    if !out_dir.exists() {
        return Ok(0);
    }

    if !out_dir.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Output path exists but is not a directory: {}",
            out_dir.display()
        )));
    }

    let mut removed = 0;
    for entry in fs::read_dir(out_dir)? {
        let path = entry?.path();
        if path.is_dir() && !path.is_symlink() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        removed += 1;
    }

    tracing::debug!(dir = %out_dir.display(), removed, "cleaned output");
    Ok(removed)
}

/// Delete generated files living outside the output root (manifests).
/// Files that do not exist are skipped.
pub fn remove_generated(paths: &[&Path]) -> Result<usize> {
    let mut removed = 0;
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed stale file");
                removed += 1;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(removed)
}
