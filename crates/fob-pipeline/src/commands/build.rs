//! `build`: clean, then every step once.

use crate::commands::utils::{resolve_mode, ProjectOptions};
use crate::error::Result;
use crate::pipeline::{BuildSummary, Pipeline};
use crate::ui;
use std::time::Instant;

/// Run a full build and fail when any step reported a compile error.
pub async fn execute(options: &ProjectOptions) -> Result<BuildSummary> {
    let config = options.load()?;
    let pipeline = Pipeline::new(config, resolve_mode());

    let started = Instant::now();
    let summary = pipeline.build().await?;

    ui::print_build_summary(&summary.reports);
    if summary.is_success() {
        ui::success(&format!(
            "Build completed in {}",
            ui::format_duration(started.elapsed())
        ));
    }

    summary.into_result()
}
