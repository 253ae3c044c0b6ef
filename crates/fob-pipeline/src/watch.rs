//! Watch orchestration: rerun a step whenever its sources change.
//!
//! Each subscription owns a [`FileWatcher`] and one task that consumes its
//! channel sequentially. Changes arriving while the step runs are coalesced
//! into a single rerun, so a step never overlaps itself.

use crate::config::SourceSet;
use crate::dev::{FileChange, FileWatcher};
use crate::error::{CliError, Result};
use crate::pipeline::{Pipeline, Step};
use crate::steps::scripts;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Running watch subscriptions. Dropping the session stops them.
pub struct WatchSession {
    tasks: Vec<(String, JoinHandle<()>)>,
}

impl WatchSession {
    /// Names of the active subscriptions.
    pub fn subscriptions(&self) -> Vec<&str> {
        self.tasks.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait until every subscription ends.
    pub async fn join(mut self) {
        for (_, handle) in std::mem::take(&mut self.tasks) {
            let _ = handle.await;
        }
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        for (_, handle) in &self.tasks {
            handle.abort();
        }
    }
}

/// Start the watch subscriptions for `pipeline`:
///
/// - stylesheet sources → styles
/// - asset directory → assets
/// - style images → styles-assets
/// - development only: script modules → scripts (the resident script watcher)
///
/// A subscription whose directory does not exist is skipped with a warning.
pub fn watch(pipeline: Arc<Pipeline>) -> Result<WatchSession> {
    let config = pipeline.config();
    let debounce_ms = config.debounce_ms;

    let mut subscriptions = vec![
        (Step::Styles, config.styles.watch_set()),
        (Step::Assets, config.assets.clone()),
        (Step::StyleAssets, config.styles.assets.clone()),
    ];
    if pipeline.mode().is_development() {
        subscriptions.push((Step::Scripts, scripts::watch_set(&config.scripts.entries)));
    }

    let mut tasks = Vec::new();
    for (step, set) in subscriptions {
        let dir = set.dir.clone();
        match FileWatcher::new(set, debounce_ms) {
            Ok((watcher, rx)) => {
                let pipeline = Arc::clone(&pipeline);
                let handle = tokio::spawn(async move {
                    let _watcher = watcher;
                    run_subscription(pipeline, step, rx).await;
                });
                tracing::info!(step = %step, dir = %dir.display(), "watching");
                tasks.push((step.name().to_string(), handle));
            }
            Err(CliError::FileNotFound(_)) => {
                crate::ui::warning(&format!(
                    "Not watching {} for {}: directory does not exist",
                    dir.display(),
                    step
                ));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(WatchSession { tasks })
}

async fn run_subscription(pipeline: Arc<Pipeline>, step: Step, mut rx: mpsc::Receiver<FileChange>) {
    while let Some(first) = rx.recv().await {
        let mut batch = vec![first];
        while let Ok(next) = rx.try_recv() {
            batch.push(next);
        }

        if step == Step::Scripts && !batch.iter().any(|c| affects_scripts(&pipeline, c)) {
            continue;
        }

        tracing::debug!(step = %step, changes = batch.len(), trigger = %batch[0].path().display(), "rerunning");
        match pipeline.run(step).await {
            Ok(report) if report.is_success() => {
                crate::ui::success(&format!(
                    "{} ({})",
                    step,
                    crate::ui::format_duration(report.duration)
                ));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(step = %step, error = %e, "step aborted");
                crate::ui::error(&format!("{} failed: {}", step, e));
            }
        }
    }
}

/// A change matters to the script bundles when it touches an entry, a
/// module of the last bundle graph, or any file that was just created (it
/// may be imported next).
fn affects_scripts(pipeline: &Pipeline, change: &FileChange) -> bool {
    let path = change.path();
    let entries: &SourceSet = &pipeline.config().scripts.entries;

    entries.matches(path)
        || pipeline.is_script_module(path)
        || matches!(change, FileChange::Created(_))
}
