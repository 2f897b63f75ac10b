//! Diagnostic logging to stderr.

use std::env;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive, e.g. `treescout=trace`.
pub const LOG_ENV: &str = "TREESCOUT_LOG";

/// Install the global subscriber. `--verbose` raises the default from `warn` to `debug`.
/// `ansi` controls escape codes in the level labels.
pub fn init_logger(verbose: bool, ansi: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = env::var(LOG_ENV).unwrap_or_else(|_| default_filter.to_string());
    let filter_layer = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_target(false)
                .without_time(),
        )
        .with(filter_layer)
        .try_init();
}
