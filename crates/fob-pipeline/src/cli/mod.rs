//! Command-line interface definition.
//!
//! # Command Structure
//!
//! - `fob-pipeline build` - clean and run every step once
//! - `fob-pipeline watch` - rerun steps when their sources change
//! - `fob-pipeline serve` - serve the output with live reload
//! - `fob-pipeline dev` - build, then watch and serve until Ctrl+C
//! - `fob-pipeline clean|styles|styles-assets|scripts|assets` - one step
//!
//! The build mode comes from `NODE_ENV`, not from a flag.

mod commands;
mod tests;

use clap::Parser;
use std::path::PathBuf;

pub use commands::{Command, ServeArgs};

/// Front-end asset pipeline: stylesheets, scripts, static assets and a
/// live-reloading dev server
#[derive(Parser, Debug)]
#[command(
    name = "fob-pipeline",
    version,
    about = "Front-end asset pipeline with a live-reloading dev server",
    long_about = "Compiles stylesheets, bundles scripts and copies static assets into the\n\
                  output directory. Set NODE_ENV=production for minified, content-hashed\n\
                  output with rename manifests."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (default: ./fob-pipeline.json when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root (default: current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Task to run
    #[command(subcommand)]
    pub command: Command,
}
