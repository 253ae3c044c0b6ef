//! Incremental file copying shared by the style-asset and asset steps.
//!
//! A file is copied only when both filters let it through:
//!
//! 1. the [`CopyCache`] has not already seen the same path with the same
//!    contents during this process, and
//! 2. the source is newer than the existing destination file.
//!
//! A destination that does not exist is always written.

use crate::config::SourceSet;
use crate::error::Result;
use crate::sources;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Process-lifetime record of the contents last seen for each source path.
#[derive(Debug, Clone, Default)]
pub struct CopyCache {
    seen: Arc<Mutex<HashMap<PathBuf, blake3::Hash>>>,
}

impl CopyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `hash` for `path`; returns false when it was already recorded.
    fn observe(&self, path: &Path, hash: blake3::Hash) -> bool {
        let mut seen = self.seen.lock();
        match seen.get(path) {
            Some(previous) if *previous == hash => false,
            _ => {
                seen.insert(path.to_path_buf(), hash);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}

/// Outcome of one copy pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Destination paths written, in source order
    pub copied: Vec<PathBuf>,
    /// Sources skipped by the cache or the mtime check
    pub skipped: usize,
    pub bytes_written: u64,
}

/// Copy every file of `set` into `dest_dir`, preserving relative paths.
pub fn copy_if_newer(set: &SourceSet, dest_dir: &Path, cache: &CopyCache) -> Result<CopyReport> {
    copy_with(set, dest_dir, cache, |_, bytes| bytes)
}

/// Like [`copy_if_newer`], passing each file's bytes through `transform`
/// before it is written.
pub fn copy_with<F>(
    set: &SourceSet,
    dest_dir: &Path,
    cache: &CopyCache,
    transform: F,
) -> Result<CopyReport>
where
    F: Fn(&Path, Vec<u8>) -> Vec<u8>,
{
    let mut report = CopyReport::default();

    for source in sources::collect(set)? {
        let relative = source.strip_prefix(&set.dir).unwrap_or(&source);
        let dest = dest_dir.join(relative);

        let bytes = fs::read(&source)?;
        let unseen = cache.observe(&source, blake3::hash(&bytes));

        let dest_exists = dest.exists();
        if dest_exists && (!unseen || !is_newer(&source, &dest)?) {
            tracing::trace!(file = %source.display(), "up to date");
            report.skipped += 1;
            continue;
        }

        let bytes = transform(&source, bytes);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, &bytes)?;

        tracing::debug!(from = %source.display(), to = %dest.display(), "copied");
        report.bytes_written += bytes.len() as u64;
        report.copied.push(dest);
    }

    Ok(report)
}

fn is_newer(source: &Path, dest: &Path) -> std::io::Result<bool> {
    let modified = |path: &Path| -> std::io::Result<SystemTime> { fs::metadata(path)?.modified() };
    Ok(modified(source)? > modified(dest)?)
}
