//! File system watcher with debouncing.
//!
//! Watches one [`SourceSet`] directory and forwards matching changes through
//! a channel. Hidden files and directories are ignored. A path is held back
//! until it has been quiet for the debounce window, so a save that arrives as
//! several raw events is delivered once, after the last of them.

use crate::config::SourceSet;
use crate::error::{CliError, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }

    /// Fold a later change of the same path into this one. A file created
    /// and then written stays `Created`.
    fn merge(self, later: FileChange) -> FileChange {
        match (self, later) {
            (FileChange::Created(_), FileChange::Modified(path)) => FileChange::Created(path),
            (_, later) => later,
        }
    }
}

/// A live subscription to one directory.
///
/// Dropping the watcher stops event delivery; pending changes are flushed
/// and the channel closes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Start watching `set.dir`.
    ///
    /// Events for files outside the set and hidden paths are dropped. Each
    /// remaining path is reported once it has seen no event for
    /// `debounce_ms`. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` when the directory doesn't exist, or the
    /// underlying notify error.
    pub fn new(set: SourceSet, debounce_ms: u64) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !set.dir.is_dir() {
            return Err(CliError::FileNotFound(set.dir));
        }

        let (raw_tx, raw_rx) = mpsc::channel(256);
        let (tx, rx) = mpsc::channel(100);
        let filter = set.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "watch error");
                    return;
                }
            };

            for path in &event.paths {
                if Self::should_ignore(path, &filter) {
                    continue;
                }

                let change = match event.kind {
                    notify::EventKind::Create(_) => FileChange::Created(path.clone()),
                    notify::EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    notify::EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                // Receiver gone means the subscription was dropped.
                if raw_tx.blocking_send(change).is_err() {
                    return;
                }
            }
        })?;

        let mode = if set.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(&set.dir, mode)?;

        tokio::spawn(debounce(raw_rx, tx, Duration::from_millis(debounce_ms)));

        tracing::debug!(dir = %set.dir.display(), "watching");
        Ok((Self { _watcher: watcher }, rx))
    }

    fn should_ignore(path: &Path, set: &SourceSet) -> bool {
        let Ok(rel_path) = path.strip_prefix(&set.dir) else {
            return true;
        };

        let hidden = rel_path.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
        });

        hidden || !set.matches(path)
    }
}

/// Trailing-edge debounce: a path is emitted once no event for it arrived
/// within `window`. Ends when either channel closes.
async fn debounce(
    mut raw: mpsc::Receiver<FileChange>,
    tx: mpsc::Sender<FileChange>,
    window: Duration,
) {
    let mut pending: HashMap<PathBuf, (FileChange, Instant)> = HashMap::new();

    loop {
        let deadline = pending.values().map(|(_, seen)| *seen + window).min();
        let received = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, raw.recv()).await {
                Ok(received) => received,
                Err(_) => {
                    if !flush(&mut pending, &tx, Some(window)).await {
                        return;
                    }
                    continue;
                }
            },
            None => raw.recv().await,
        };

        match received {
            Some(change) => {
                let path = change.path().to_path_buf();
                let merged = match pending.remove(&path) {
                    Some((earlier, _)) => earlier.merge(change),
                    None => change,
                };
                pending.insert(path, (merged, Instant::now()));
            }
            None => {
                flush(&mut pending, &tx, None).await;
                return;
            }
        }
    }
}

/// Send every pending change that has been quiet for `window` (all of them
/// when `window` is `None`), oldest first. Returns false once the receiver
/// is gone.
async fn flush(
    pending: &mut HashMap<PathBuf, (FileChange, Instant)>,
    tx: &mpsc::Sender<FileChange>,
    window: Option<Duration>,
) -> bool {
    let now = Instant::now();
    let due: Vec<PathBuf> = pending
        .iter()
        .filter(|(_, (_, seen))| window.is_none_or(|w| *seen + w <= now))
        .map(|(path, _)| path.clone())
        .collect();

    let mut ready: Vec<(FileChange, Instant)> =
        due.iter().filter_map(|path| pending.remove(path)).collect();
    ready.sort_by_key(|(_, seen)| *seen);

    for (change, _) in ready {
        if tx.send(change).await.is_err() {
            return false;
        }
    }
    true
}
