//! Error handling for the asset pipeline.
//!
//! Errors are split the same way the pipeline treats failures:
//!
//! - **Fatal errors** (`CliError::Io`, configuration problems) abort the
//!   running command.
//! - **Compile errors** (`StyleError`, `ScriptError`) are caught at the step
//!   boundary and turned into a [`Notification`](crate::notification::Notification).
//!   They only become a `CliError` when a one-shot command decides to fail
//!   its exit status.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (file not found, invalid values, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A build step failed
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Development server errors
    #[error("Server error: {0}")]
    Server(String),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Explicitly requested config file doesn't exist
    #[error("Config file not found: {}\n\nHint: Create a fob-pipeline.json file or drop the --config flag", .0.display())]
    NotFound(PathBuf),

    /// Missing required configuration field
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// Helpful hint for providing the field
        hint: String,
    },

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

/// Stylesheet compilation errors.
#[derive(Debug, Error)]
pub enum StyleError {
    /// Parse or @import resolution failure
    #[error("{message}")]
    Compile { message: String },

    /// A relative url() points at a file that does not exist
    #[error("Unresolved url({url}) in {}", .file.display())]
    UnresolvedUrl { url: String, file: PathBuf },

    /// Minifier rejected the stylesheet
    #[error("Failed to minify stylesheet: {0}")]
    Minify(String),

    /// Printer failed to serialize the stylesheet
    #[error("Failed to print stylesheet: {0}")]
    Print(String),

    /// Source map generation failed
    #[error("Source map error: {0}")]
    SourceMap(String),

    /// Writing compiled output failed
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Script bundling errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Rolldown reported one or more diagnostics
    #[error("Failed to bundle {entry}: {message}")]
    Bundler { entry: String, message: String },

    /// Rolldown produced no entry chunk for an entry point
    #[error("Bundler produced no output for entry '{0}'")]
    NoEntryChunk(String),

    /// Reading sources or writing bundles failed
    #[error("I/O error in script pipeline: {0}")]
    Io(#[from] std::io::Error),
}

/// Build process errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// One or more recoverable steps failed during a one-shot run
    #[error("{} step(s) failed: {}\n\nHint: Fix the reported errors and run the build again", .steps.len(), .steps.join(", "))]
    StepsFailed {
        /// Names of the failed steps
        steps: Vec<String>,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a `CliError` into a miette report for the process exit path.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        CliError::Build(BuildError::StepsFailed { steps }) => miette::miette!(
            help = "Fix the reported errors and save to rebuild",
            "{} step(s) failed: {}",
            steps.len(),
            steps.join(", ")
        ),
        _ => miette::miette!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound(PathBuf::from("fob-pipeline.json"));
        let msg = err.to_string();
        assert!(msg.contains("Config file not found"));
        assert!(msg.contains("fob-pipeline.json"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_style_error_unresolved_url() {
        let err = StyleError::UnresolvedUrl {
            url: "img/missing.png".to_string(),
            file: PathBuf::from("frontend/styles/index.css"),
        };
        let msg = err.to_string();
        assert!(msg.contains("img/missing.png"));
        assert!(msg.contains("frontend/styles/index.css"));
    }

    #[test]
    fn test_steps_failed_lists_steps() {
        let err = BuildError::StepsFailed {
            steps: vec!["styles".to_string(), "scripts".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 step(s) failed: styles, scripts"));
    }

    #[test]
    fn test_miette_conversion_keeps_message() {
        let report = cli_error_to_miette(CliError::Server("port in use".to_string()));
        assert!(report.to_string().contains("port in use"));
    }

    #[test]
    fn test_miette_conversion_lists_failed_steps() {
        let err: CliError = BuildError::StepsFailed {
            steps: vec!["styles".to_string()],
        }
        .into();
        let report = cli_error_to_miette(err);
        assert_eq!(report.to_string(), "1 step(s) failed: styles");
    }

    #[test]
    fn test_io_error_converts() {
        let err: CliError = std::io::Error::other("disk full").into();
        assert!(matches!(err, CliError::Io(_)));
    }
}
