//! Logging setup for the xtensio CLI.
//!
//! Library code logs through `tracing`; this module installs the subscriber
//! that renders it. Verbosity comes from `--verbose`/`--quiet`, falling back
//! to `RUST_LOG` and then to INFO for the xtensio crates.
//!
//! ```rust,no_run
//! use xtensio_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("assembling build configuration");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "xtensio_cli=debug,xtensio_config=debug";
const QUIET_FILTER: &str = "xtensio_cli=error,xtensio_config=error";
const DEFAULT_FILTER: &str = "xtensio_cli=info,xtensio_config=info";

/// Pick the filter directive for the given flags.
///
/// `verbose` wins over `quiet`; with neither set, `RUST_LOG` is honored.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize the subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    // try_init: tests may install a subscriber first.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
