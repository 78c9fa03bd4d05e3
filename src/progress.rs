//! Progress feedback for long-running pipeline stages.
//!
//! Sentiment inference is the only stage slow enough to need a bar; it
//! runs one model call per tweet.
//!
//! # Progress Behavior
//!
//! - **Quiet Mode**: No progress output (respects `TWEETALIGN_QUIET`)
//! - **Non-TTY**: Progress bars are hidden in CI and piped output
//!
//! # Examples
//!
//! ```rust,no_run
//! use tweetalign::progress::{ProgressConfig, ProgressManager, TEMPLATE_INFERENCE};
//!
//! let manager = ProgressManager::new(ProgressConfig::from_env(false, 0));
//! let progress = manager.create_bar(100, TEMPLATE_INFERENCE);
//! progress.set_message("Scoring tweets");
//! for _ in 0..100 {
//!     progress.inc(1);
//! }
//! progress.finish_and_clear();
//! ```

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;

// Progress bar templates
pub const TEMPLATE_INFERENCE: &str =
    "💬 {msg} {pos}/{len} tweets ({percent}%) - {per_sec}/sec - {eta}";
pub const TEMPLATE_SPINNER: &str = "{spinner} {msg}";

/// Configuration for progress display behavior
#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    /// Whether to suppress all progress output
    pub quiet_mode: bool,
    /// Verbosity level (0 = basic, 1 = detailed, 2 = very detailed)
    pub verbosity: u8,
}

impl ProgressConfig {
    /// Create progress configuration from environment and CLI arguments
    pub fn from_env(quiet: bool, verbosity: u8) -> Self {
        let env_quiet = std::env::var("TWEETALIGN_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
            verbosity,
        }
    }

    /// Determine if progress bars should be displayed
    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }
}

/// Owner of the progress bars drawn during a run
#[derive(Clone)]
pub struct ProgressManager {
    multi: Arc<MultiProgress>,
    config: ProgressConfig,
}

impl ProgressManager {
    pub fn new(config: ProgressConfig) -> Self {
        Self {
            multi: Arc::new(MultiProgress::new()),
            config,
        }
    }

    /// A manager that never draws anything.
    pub fn hidden() -> Self {
        Self::new(ProgressConfig {
            quiet_mode: true,
            verbosity: 0,
        })
    }

    /// Create a progress bar with the given length and template
    ///
    /// Returns a hidden progress bar if progress should not be shown
    pub fn create_bar(&self, len: u64, template: &str) -> ProgressBar {
        if !self.config.should_show_progress() {
            return ProgressBar::hidden();
        }

        let pb = self.multi.add(ProgressBar::new(len));
        pb.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░  "),
        );
        pb
    }

    /// Create a spinner with the given message
    pub fn create_spinner(&self, msg: &str) -> ProgressBar {
        if !self.config.should_show_progress() {
            return ProgressBar::hidden();
        }

        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template(TEMPLATE_SPINNER)
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    pub fn verbosity(&self) -> u8 {
        self.config.verbosity
    }
}
