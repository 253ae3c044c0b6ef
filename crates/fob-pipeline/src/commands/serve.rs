//! `serve`: dev server over the output directory.

use crate::cli::ServeArgs;
use crate::commands::utils::{server_config, shutdown_signal, ProjectOptions};
use crate::dev::{DevServer, OutputWatcher, ReloadHub};
use crate::error::Result;
use crate::ui;
use std::fs;
use std::sync::Arc;

/// Serve the output tree and reload browsers on every change to it.
pub async fn execute(options: &ProjectOptions, args: &ServeArgs) -> Result<()> {
    let config = options.load()?;
    let hub = Arc::new(ReloadHub::new());

    fs::create_dir_all(&config.out_dir)?;
    let _output_watcher =
        OutputWatcher::spawn(&config.out_dir, Vec::new(), hub.clone(), config.debounce_ms)?;

    let server = DevServer::new(
        config.out_dir.clone(),
        server_config(&config.server, args),
        hub,
    );
    let listener = server.bind().await?;

    ui::info("Press Ctrl+C to stop");
    server.serve(listener, shutdown_signal()).await?;

    ui::success("Development server stopped");
    Ok(())
}
