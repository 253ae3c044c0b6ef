//! Step wiring and the build orchestrator.
//!
//! A [`Pipeline`] owns everything that outlives a single step run: the
//! resolved configuration, the build mode, the copy caches, the reload hub
//! and the notifier. Compile errors are caught here and reported; I/O
//! errors propagate and abort whatever is running.

use crate::config::PipelineConfig;
use crate::dev::{output_watcher::url_path, ReloadEvent, ReloadHub, SharedHub};
use crate::error::{BuildError, Result, ScriptError, StyleError};
use crate::mode::Mode;
use crate::notification::{Notification, SharedNotifier, TerminalNotifier};
use crate::steps::{self, CopyCache, ScriptJob, StyleJob};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A single named step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Clean,
    StyleAssets,
    Styles,
    Scripts,
    Assets,
}

impl Step {
    /// Build order.
    pub const ALL: [Step; 5] = [
        Step::Clean,
        Step::StyleAssets,
        Step::Styles,
        Step::Scripts,
        Step::Assets,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::Clean => "clean",
            Step::StyleAssets => "styles-assets",
            Step::Styles => "styles",
            Step::Scripts => "scripts",
            Step::Assets => "assets",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What one step run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: String,
    pub files_written: usize,
    pub bytes_written: u64,
    pub duration: Duration,
    /// Compile error text when the step failed recoverably
    pub failure: Option<String>,
}

impl StepReport {
    fn new(step: Step, started: Instant) -> Self {
        Self {
            step: step.name().to_string(),
            files_written: 0,
            bytes_written: 0,
            duration: started.elapsed(),
            failure: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Reports of a full build, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub reports: Vec<StepReport>,
}

impl BuildSummary {
    pub fn failed_steps(&self) -> Vec<String> {
        self.reports
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| r.step.clone())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.reports.iter().all(StepReport::is_success)
    }

    /// Turn recorded compile failures into an error for one-shot commands.
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BuildError::StepsFailed {
                steps: self.failed_steps(),
            }
            .into())
        }
    }
}

/// The configured asset pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    mode: Mode,
    style_asset_cache: CopyCache,
    asset_cache: CopyCache,
    hub: SharedHub,
    notifier: SharedNotifier,
    script_modules: RwLock<BTreeSet<PathBuf>>,
}

impl Pipeline {
    /// Pipeline for a resolved configuration, notifying on the terminal.
    pub fn new(config: PipelineConfig, mode: Mode) -> Self {
        Self {
            config,
            mode,
            style_asset_cache: CopyCache::new(),
            asset_cache: CopyCache::new(),
            hub: Arc::new(ReloadHub::new()),
            notifier: Arc::new(TerminalNotifier),
            script_modules: RwLock::new(BTreeSet::new()),
        }
    }

    pub fn with_hub(mut self, hub: SharedHub) -> Self {
        self.hub = hub;
        self
    }

    pub fn with_notifier(mut self, notifier: SharedNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn hub(&self) -> &SharedHub {
        &self.hub
    }

    /// Source modules of the last successful script build.
    pub fn script_modules(&self) -> BTreeSet<PathBuf> {
        self.script_modules.read().clone()
    }

    /// Whether `path` took part in the last script build.
    pub fn is_script_module(&self, path: &Path) -> bool {
        self.script_modules.read().contains(path)
    }

    /// Run one step by name.
    pub async fn run(&self, step: Step) -> Result<StepReport> {
        match step {
            Step::Clean => self.clean(),
            Step::StyleAssets => self.style_assets(),
            Step::Styles => self.styles(),
            Step::Scripts => self.scripts().await,
            Step::Assets => self.assets(),
        }
    }

    /// clean → styles-assets → styles → scripts → assets.
    ///
    /// Compile failures are recorded in the summary and the sequence goes on;
    /// I/O errors stop it.
    pub async fn build(&self) -> Result<BuildSummary> {
        tracing::info!(mode = %self.mode, "build started");
        let mut summary = BuildSummary::default();
        for step in Step::ALL {
            summary.reports.push(self.run(step).await?);
        }
        tracing::info!(failed = summary.failed_steps().len(), "build finished");
        Ok(summary)
    }

    /// Empty the output root and drop manifests left by earlier builds, so
    /// assets are never rewritten against hashes that no longer exist.
    pub fn clean(&self) -> Result<StepReport> {
        let started = Instant::now();
        steps::clean(&self.config.out_dir)?;
        let style_manifest = self.config.style_manifest_path();
        let script_manifest = self.config.script_manifest_path();
        steps::remove_generated(&[style_manifest.as_path(), script_manifest.as_path()])?;
        Ok(StepReport::new(Step::Clean, started))
    }

    pub fn style_assets(&self) -> Result<StepReport> {
        let started = Instant::now();
        let copied = steps::copy_if_newer(
            &self.config.styles.assets,
            &self.config.styles.out_dir,
            &self.style_asset_cache,
        )?;

        let mut report = StepReport::new(Step::StyleAssets, started);
        report.files_written = copied.copied.len();
        report.bytes_written = copied.bytes_written;
        Ok(report)
    }

    pub fn styles(&self) -> Result<StepReport> {
        let started = Instant::now();
        let manifest_path = self.config.style_manifest_path();
        let job = StyleJob {
            entry: &self.config.styles.entry,
            out_dir: &self.config.styles.out_dir,
            manifest_path: &manifest_path,
            hash_length: self.config.hash_length,
            root: self.config.root(),
        };

        let result = steps::compile_styles(&job, self.mode);
        let mut report = StepReport::new(Step::Styles, started);

        match result {
            Ok(Some(output)) => {
                report.files_written = 1 + usize::from(output.map_path.is_some());
                report.bytes_written = output.bytes_written;
                self.hub.broadcast(&ReloadEvent::Css {
                    paths: vec![url_path(&output.css_path, &self.config.out_dir)],
                });
            }
            Ok(None) => {}
            Err(StyleError::Write { source, .. }) => return Err(source.into()),
            Err(e) => report.failure = Some(self.report_failure("Styles", &e)),
        }

        Ok(report)
    }

    pub async fn scripts(&self) -> Result<StepReport> {
        let started = Instant::now();
        let manifest_path = self.config.script_manifest_path();
        let job = ScriptJob {
            entries: &self.config.scripts.entries,
            out_dir: &self.config.scripts.out_dir,
            manifest_path: &manifest_path,
            public_path: &self.config.scripts.public_path,
            hash_length: self.config.hash_length,
            root: self.config.root(),
        };

        let result = steps::build_scripts(&job, self.mode).await;
        let mut report = StepReport::new(Step::Scripts, started);

        match result {
            Ok(output) => {
                report.files_written = output.bundles.len();
                report.bytes_written = output.bundles.iter().map(|b| b.bytes).sum();
                *self.script_modules.write() = output.modules;
                if !output.bundles.is_empty() {
                    self.hub.broadcast(&ReloadEvent::Reload);
                }
            }
            Err(ScriptError::Io(e)) => return Err(e.into()),
            Err(e) => report.failure = Some(self.report_failure("Scripts", &e)),
        }

        Ok(report)
    }

    pub fn assets(&self) -> Result<StepReport> {
        let started = Instant::now();
        let copied = steps::copy_assets(
            &self.config.assets,
            &self.config.out_dir,
            &self.config.style_manifest_path(),
            self.mode,
            &self.asset_cache,
        )?;

        let mut report = StepReport::new(Step::Assets, started);
        report.files_written = copied.copied.len();
        report.bytes_written = copied.bytes_written;
        Ok(report)
    }

    fn report_failure(&self, title: &str, error: &dyn fmt::Display) -> String {
        let message = error.to_string();
        self.notifier.notify(&Notification::new(title, message.clone()));
        message
    }
}
