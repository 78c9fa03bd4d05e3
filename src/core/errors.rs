//! Shared error types for the library

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tweetalign operations
#[derive(Debug, Error)]
pub enum Error {
    /// Neither the primary input nor its fallback could be opened
    #[error("Input not found: {} (fallback {} also missing)", primary.display(), fallback.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<none>".to_string()))]
    InputNotFound {
        primary: PathBuf,
        fallback: Option<PathBuf>,
    },

    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A column the operation cannot run without is absent
    #[error("Missing column '{0}'")]
    MissingColumn(String),

    /// Quantile parameters outside [0, 1] or inverted
    #[error("Invalid quantiles: low={low}, high={high} (expected 0 <= low <= high <= 1)")]
    InvalidQuantile { low: f64, high: f64 },

    /// Thresholds are undefined over an empty user population
    #[error("Cannot classify camps: no users to derive thresholds from")]
    EmptyPopulation,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Sentiment model failures
    #[error("Sentiment model error: {0}")]
    Sentiment(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// CSV errors
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a file system error with path context
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_not_found_names_both_paths() {
        let err = Error::InputNotFound {
            primary: PathBuf::from("data/tweets.csv"),
            fallback: Some(PathBuf::from("Data/tweets_with_sentiment.csv")),
        };
        let message = err.to_string();
        assert!(message.contains("data/tweets.csv"));
        assert!(message.contains("Data/tweets_with_sentiment.csv"));
    }

    #[test]
    fn test_context_wraps_message() {
        let result: Result<()> = Err(Error::MissingColumn("source".into()));
        let err = result.context("source distribution").unwrap_err();
        assert_eq!(
            err.to_string(),
            "source distribution: Missing column 'source'"
        );
    }
}
