//! Structured logging setup.
//!
//! Logging goes to stderr so report output on stdout stays machine readable.
//! `RUST_LOG` wins over the verbosity flag when set. Records emitted through
//! the `log` facade are forwarded into the same subscriber.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter directive for a `-v` count.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= 2),
        )
        .try_init();

    if let Err(e) = result {
        tracing::debug!("Tracing already initialised: {}", e);
    }
}
