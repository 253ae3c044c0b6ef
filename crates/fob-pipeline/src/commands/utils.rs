use crate::cli::ServeArgs;
use crate::config::{PipelineConfig, ServerConfig};
use crate::error::Result;
use crate::mode::Mode;
use std::path::PathBuf;

/// Where the project lives and which config file to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectOptions {
    pub cwd: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl ProjectOptions {
    /// Project root: `--cwd` resolved against the current directory.
    pub fn root(&self) -> Result<PathBuf> {
        let current = std::env::current_dir()?;
        Ok(match &self.cwd {
            Some(cwd) if cwd.is_absolute() => cwd.clone(),
            Some(cwd) => current.join(cwd),
            None => current,
        })
    }

    /// Load and validate the configuration.
    pub fn load(&self) -> Result<PipelineConfig> {
        let root = self.root()?;
        let config = PipelineConfig::load(&root, self.config.as_deref())?;
        tracing::debug!(root = %root.display(), out_dir = %config.out_dir.display(), "configuration loaded");
        Ok(config)
    }
}

/// Mode for this process, announced once.
pub(crate) fn resolve_mode() -> Mode {
    let mode = Mode::from_env();
    tracing::info!(%mode, "build mode");
    mode
}

/// Apply `--port` / `--host` on top of the configured server settings.
pub(crate) fn server_config(base: &ServerConfig, args: &ServeArgs) -> ServerConfig {
    let mut server = base.clone();
    if let Some(port) = args.port {
        server.port = port;
    }
    if let Some(host) = &args.host {
        server.host = host.clone();
    }
    server
}

/// Wait for Ctrl+C.
pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
