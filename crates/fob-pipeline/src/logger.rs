//! Logging setup built on `tracing`.
//!
//! Library code only emits events; the binary installs the subscriber once
//! through [`init_logger`].
//!
//! ```rust,no_run
//! use fob_pipeline::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!(step = "styles", "compiled");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "fob_pipeline=debug,tower_http=debug";
const QUIET_FILTER: &str = "fob_pipeline=error";
const DEFAULT_FILTER: &str = "fob_pipeline=info";

/// Pick the filter directive for the given flags.
///
/// `--verbose` beats `--quiet`; without flags `RUST_LOG` is honoured and
/// falls back to info level for this crate.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber.
///
/// Uses `try_init` so a second call (tests, embedding) is a no-op instead of
/// a panic.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_build() {
        let _ = filter_for(true, false);
        let _ = filter_for(false, true);
        let _ = filter_for(false, false);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logger(false, true, true);
        init_logger(true, false, true);
    }
}
