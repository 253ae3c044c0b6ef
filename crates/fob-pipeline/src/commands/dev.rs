//! `dev`: build once, then watch and serve until Ctrl+C.
//!
//! Lifecycle:
//! 1. Full build (compile failures are reported, not fatal)
//! 2. Watch subscriptions for every step
//! 3. Output watcher for files no step announces itself
//! 4. HTTP server with live reload
//! 5. Graceful shutdown on Ctrl+C

use crate::cli::ServeArgs;
use crate::commands::utils::{resolve_mode, server_config, shutdown_signal, ProjectOptions};
use crate::config::{PipelineConfig, SourceSet};
use crate::dev::{BrowserNotifier, DevServer, OutputWatcher, ReloadHub};
use crate::error::Result;
use crate::notification::{FanoutNotifier, SharedNotifier, TerminalNotifier};
use crate::pipeline::Pipeline;
use crate::ui;
use std::fs;
use std::sync::Arc;

pub async fn execute(options: &ProjectOptions, args: &ServeArgs) -> Result<()> {
    let config = options.load()?;
    let mode = resolve_mode();

    let hub = Arc::new(ReloadHub::new());
    let notifier: SharedNotifier = Arc::new(FanoutNotifier::new(vec![
        Arc::new(TerminalNotifier),
        Arc::new(BrowserNotifier::new(hub.clone())),
    ]));

    let pipeline = Arc::new(
        Pipeline::new(config.clone(), mode)
            .with_hub(hub.clone())
            .with_notifier(notifier),
    );

    ui::info(&format!("Initial {} build...", mode));
    let summary = pipeline.build().await?;
    ui::print_build_summary(&summary.reports);
    if !summary.is_success() {
        ui::warning("Continuing with failed steps; fix them and save to rebuild");
    }

    let session = crate::watch::watch(pipeline.clone())?;

    fs::create_dir_all(&config.out_dir)?;
    let _output_watcher = OutputWatcher::spawn(
        &config.out_dir,
        announced_outputs(&config),
        hub.clone(),
        config.debounce_ms,
    )?;

    let server = DevServer::new(
        config.out_dir.clone(),
        server_config(&config.server, args),
        hub,
    );
    let listener = server.bind().await?;

    ui::info("Press Ctrl+C to stop");
    server.serve(listener, shutdown_signal()).await?;

    drop(session);
    ui::success("Development server stopped");
    Ok(())
}

/// Outputs whose writers broadcast their own reload event.
fn announced_outputs(config: &PipelineConfig) -> Vec<SourceSet> {
    vec![
        SourceSet {
            dir: config.styles.out_dir.clone(),
            extensions: vec!["css".to_string(), "map".to_string()],
            recursive: false,
        },
        SourceSet {
            dir: config.scripts.out_dir.clone(),
            extensions: vec!["js".to_string(), "map".to_string()],
            recursive: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_announced_outputs_cover_step_files() {
        let config = PipelineConfig::default().resolve(Path::new("/p"));
        let sets = announced_outputs(&config);
        let covered = |p: &str| sets.iter().any(|s| s.matches(Path::new(p)));

        assert!(covered("/p/public/styles/index.css"));
        assert!(covered("/p/public/styles/index.css.map"));
        assert!(covered("/p/public/js/main.js"));
        assert!(!covered("/p/public/styles/icon.png"));
        assert!(!covered("/p/public/index.html"));
    }
}
