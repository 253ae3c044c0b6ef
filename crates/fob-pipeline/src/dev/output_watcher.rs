//! Watches the output tree and tells browsers to refresh.

use crate::config::SourceSet;
use crate::dev::{FileChange, FileWatcher, ReloadEvent, SharedHub};
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Background task turning output changes into reload events.
///
/// Changes arriving within the debounce window are merged into one event:
/// a batch made only of stylesheets becomes [`ReloadEvent::Css`], anything
/// else a full [`ReloadEvent::Reload`]. Source maps never trigger a reload.
pub struct OutputWatcher {
    handle: JoinHandle<()>,
}

impl OutputWatcher {
    /// Start watching `out_dir`.
    ///
    /// Files matching one of `announced` are skipped because the step that
    /// writes them signals the reload itself.
    pub fn spawn(
        out_dir: &Path,
        announced: Vec<SourceSet>,
        hub: SharedHub,
        debounce_ms: u64,
    ) -> Result<Self> {
        let set = SourceSet {
            dir: out_dir.to_path_buf(),
            extensions: Vec::new(),
            recursive: true,
        };
        let (watcher, rx) = FileWatcher::new(set, debounce_ms)?;
        let out_dir = out_dir.to_path_buf();
        let window = Duration::from_millis(debounce_ms.max(10));

        let handle = tokio::spawn(async move {
            let _watcher = watcher;
            run(rx, &out_dir, &announced, &hub, window).await;
        });

        Ok(Self { handle })
    }
}

impl Drop for OutputWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(
    mut rx: mpsc::Receiver<FileChange>,
    out_dir: &Path,
    announced: &[SourceSet],
    hub: &SharedHub,
    window: Duration,
) {
    while let Some(first) = rx.recv().await {
        let mut batch = vec![first];
        while let Ok(Some(next)) = tokio::time::timeout(window, rx.recv()).await {
            batch.push(next);
        }

        let paths: Vec<PathBuf> = batch
            .iter()
            .map(|change| change.path().to_path_buf())
            .filter(|path| !announced.iter().any(|set| set.matches(path)))
            .collect();

        if let Some(event) = classify(&paths, out_dir) {
            tracing::debug!(event = ?event, changed = paths.len(), "output changed");
            hub.broadcast(&event);
        }
    }
}

/// Pick the event for a batch of changed output paths.
pub(crate) fn classify(paths: &[PathBuf], out_dir: &Path) -> Option<ReloadEvent> {
    let relevant: Vec<&PathBuf> = paths.iter().filter(|p| !has_extension(p, "map")).collect();
    if relevant.is_empty() {
        return None;
    }

    if relevant.iter().all(|p| has_extension(p, "css")) {
        let mut urls: Vec<String> = relevant.iter().map(|p| url_path(p, out_dir)).collect();
        urls.sort();
        urls.dedup();
        return Some(ReloadEvent::Css { paths: urls });
    }

    Some(ReloadEvent::Reload)
}

/// URL under which the server exposes `path`.
pub(crate) fn url_path(path: &Path, out_dir: &Path) -> String {
    let rel = path.strip_prefix(out_dir).unwrap_or(path);
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("/{}", parts.join("/"))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
