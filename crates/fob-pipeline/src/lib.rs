//! Fob pipeline - front-end asset pipeline with a live-reloading dev server.
//!
//! Compiles the stylesheet entry with lightningcss, bundles script entries
//! with Rolldown and copies static assets into a single output directory. In
//! production (`NODE_ENV=production`) outputs are minified and content-hashed,
//! with rename manifests that the asset step uses to rewrite references.
//!
//! # Architecture
//!
//! - [`mode`] - development / production switch
//! - [`config`] - layered configuration (defaults, JSON file, environment)
//! - [`steps`] - clean, copy, styles, scripts and assets
//! - [`pipeline`] - step wiring and the build orchestrator
//! - [`watch`] - rerun steps on source changes
//! - [`dev`] - file watchers, reload hub and HTTP server
//! - [`error`], [`logger`], [`ui`] - ambient CLI plumbing
//!
//! # Example
//!
//! ```rust,no_run
//! use fob_pipeline::{config::PipelineConfig, mode::Mode, pipeline::Pipeline};
//!
//! # async fn run() -> fob_pipeline::Result<()> {
//! let config = PipelineConfig::load(std::path::Path::new("."), None)?;
//! let summary = Pipeline::new(config, Mode::from_env()).build().await?;
//! summary.into_result()?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod hash;
pub mod logger;
pub mod manifest;
pub mod mode;
pub mod notification;
pub mod pipeline;
pub mod sources;
pub mod steps;
pub mod ui;
pub mod watch;

pub use error::{BuildError, CliError, ConfigError, Result};
pub use mode::Mode;
pub use pipeline::{Pipeline, Step};
