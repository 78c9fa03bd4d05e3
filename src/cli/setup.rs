//! Runtime setup: logging, colours and the rayon pool.

use crate::formatting::FormattingConfig;
use crate::observability::init_tracing;

/// Configure rayon global thread pool once at startup
pub fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new();

    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }

    if let Err(e) = builder.build_global() {
        tracing::debug!("Thread pool already configured: {}", e);
    }
}

pub fn create_formatting_config(plain: bool) -> FormattingConfig {
    if plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    }
}

/// Logging and colour setup shared by every command.
pub fn init_runtime(verbosity: u8, plain: bool) {
    init_tracing(verbosity);
    create_formatting_config(plain).apply();
}
