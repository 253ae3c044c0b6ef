//! Single-step tasks: `clean`, `styles`, `styles-assets`, `scripts`, `assets`.

use crate::commands::utils::{resolve_mode, ProjectOptions};
use crate::error::{BuildError, Result};
use crate::pipeline::{Pipeline, Step, StepReport};
use crate::ui;

/// Run `step` once.
///
/// A compile failure has already been reported by the pipeline; it still
/// makes the task exit non-zero.
pub async fn execute(options: &ProjectOptions, step: Step) -> Result<StepReport> {
    let config = options.load()?;
    let pipeline = Pipeline::new(config, resolve_mode());

    ui::step(step.name());
    let report = pipeline.run(step).await?;

    match &report.failure {
        None => {
            ui::success(&format!(
                "{}: {} file(s), {} in {}",
                step,
                report.files_written,
                ui::format_size(report.bytes_written),
                ui::format_duration(report.duration)
            ));
            Ok(report)
        }
        Some(_) => Err(BuildError::StepsFailed {
            steps: vec![report.step],
        }
        .into()),
    }
}
