//! `watch`: rerun steps on source changes until Ctrl+C.

use crate::commands::utils::{resolve_mode, shutdown_signal, ProjectOptions};
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::ui;
use std::sync::Arc;

pub async fn execute(options: &ProjectOptions) -> Result<()> {
    let config = options.load()?;
    let pipeline = Arc::new(Pipeline::new(config, resolve_mode()));

    let session = crate::watch::watch(pipeline)?;
    if session.is_empty() {
        ui::warning("Nothing to watch");
        return Ok(());
    }

    ui::info(&format!(
        "Watching {}. Press Ctrl+C to stop",
        session.subscriptions().join(", ")
    ));
    shutdown_signal().await;

    drop(session);
    ui::success("Watch stopped");
    Ok(())
}
