//! CLI module for tweetalign
//!
//! - Argument parsing (`args`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod setup;

pub use args::{Cli, Commands};
pub use setup::{configure_thread_pool, create_formatting_config, init_runtime};
