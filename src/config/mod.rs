//! `.tweetalign.toml` configuration.
//!
//! The file is discovered by walking up from the working directory, or
//! named explicitly with `--config`. Every section is optional; accessors
//! on [`TweetalignConfig`] fill in defaults. Command-line flags override
//! file values.

mod accessors;
mod core;
mod loader;

pub use accessors::parse_delimiter;
pub use core::{
    default_high_quantile, default_low_quantile, CampsConfig, InputConfig, MapConfig,
    ReportConfig, SentimentConfig, TweetalignConfig,
};
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_dir,
    parse_and_validate_config, CONFIG_FILE_NAME,
};

use std::path::Path;

/// Explicit path when given, discovery otherwise.
pub fn resolve_config(explicit: Option<&Path>) -> crate::core::Result<TweetalignConfig> {
    match explicit {
        Some(path) => load_config_from(path),
        None => Ok(load_config()),
    }
}

/// Written by `tweetalign init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# tweetalign configuration

[camps]
# Users at or below the low quantile of mean alignment are Biden,
# at or above the high quantile Trump.
low_quantile = 0.40
high_quantile = 0.80

[report]
min_tweets = 3
top_influencers = 10
rolling_window = 7
top_sources = 3
top_hashtags = 10

[input]
fallback = "Data/tweets_with_sentiment.csv"
# delimiter = ","

[sentiment]
text_column = "tweet"
max_chars = 512
neutral_band = 0.05
clean = false

[map]
levels = 22
top_states = 10
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses_to_defaults() {
        let config = parse_and_validate_config(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config.camps(), CampsConfig::default());
        assert_eq!(config.report(), ReportConfig::default());
        assert_eq!(config.sentiment(), SentimentConfig::default());
        assert_eq!(config.map(), MapConfig::default());
        assert_eq!(
            config.fallback_path().as_deref(),
            Some(Path::new("Data/tweets_with_sentiment.csv"))
        );
    }
}
