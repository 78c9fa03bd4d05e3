use std::path::PathBuf;

use super::core::{CampsConfig, MapConfig, ReportConfig, SentimentConfig, TweetalignConfig};
use crate::report::ReportOptions;
use crate::sentiment::SentimentOptions;

impl TweetalignConfig {
    pub fn camps(&self) -> CampsConfig {
        self.camps.clone().unwrap_or_default()
    }

    pub fn report(&self) -> ReportConfig {
        self.report.clone().unwrap_or_default()
    }

    pub fn sentiment(&self) -> SentimentConfig {
        self.sentiment.clone().unwrap_or_default()
    }

    pub fn map(&self) -> MapConfig {
        self.map.clone().unwrap_or_default()
    }

    pub fn fallback_path(&self) -> Option<PathBuf> {
        self.input
            .as_ref()
            .and_then(|i| i.fallback.as_ref())
            .map(PathBuf::from)
    }

    /// Configured delimiter as a byte, when it is a single ASCII character.
    pub fn delimiter(&self) -> Option<u8> {
        self.input
            .as_ref()
            .and_then(|i| i.delimiter.as_deref())
            .and_then(parse_delimiter)
    }

    pub fn report_options(&self) -> ReportOptions {
        let report = self.report();
        ReportOptions {
            min_tweets: report.min_tweets,
            top_influencers: report.top_influencers,
            rolling_window: report.rolling_window,
            top_sources: report.top_sources,
            top_hashtags: report.top_hashtags,
        }
    }

    pub fn sentiment_options(&self) -> SentimentOptions {
        let sentiment = self.sentiment();
        SentimentOptions {
            text_column: sentiment.text_column,
            max_chars: sentiment.max_chars,
            clean: sentiment.clean,
            ..SentimentOptions::default()
        }
    }
}

/// `\t` and `tab` are accepted for tab.
pub fn parse_delimiter(value: &str) -> Option<u8> {
    match value {
        "\\t" | "tab" | "\t" => Some(b'\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Some(c as u8),
                _ => None,
            }
        }
    }
}
