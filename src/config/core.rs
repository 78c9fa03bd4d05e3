use serde::{Deserialize, Serialize};

/// Root configuration structure for tweetalign
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TweetalignConfig {
    /// Camp quantile thresholds
    #[serde(default)]
    pub camps: Option<CampsConfig>,

    /// Label report tunables
    #[serde(default)]
    pub report: Option<ReportConfig>,

    /// Input file handling
    #[serde(default)]
    pub input: Option<InputConfig>,

    /// Sentiment inference settings
    #[serde(default)]
    pub sentiment: Option<SentimentConfig>,

    /// World dominance map settings
    #[serde(default)]
    pub map: Option<MapConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampsConfig {
    #[serde(default = "default_low_quantile")]
    pub low_quantile: f64,

    #[serde(default = "default_high_quantile")]
    pub high_quantile: f64,
}

impl Default for CampsConfig {
    fn default() -> Self {
        Self {
            low_quantile: default_low_quantile(),
            high_quantile: default_high_quantile(),
        }
    }
}

impl CampsConfig {
    pub fn validate(&self) -> Result<(), String> {
        let in_range = |q: f64| (0.0..=1.0).contains(&q);
        if !in_range(self.low_quantile) || !in_range(self.high_quantile) {
            return Err(format!(
                "quantiles must be within [0, 1], got low={} high={}",
                self.low_quantile, self.high_quantile
            ));
        }
        if self.low_quantile > self.high_quantile {
            return Err(format!(
                "low_quantile ({}) exceeds high_quantile ({})",
                self.low_quantile, self.high_quantile
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    /// Minimum tweets for a user to count as an influencer
    #[serde(default = "default_min_tweets")]
    pub min_tweets: usize,

    #[serde(default = "default_top_influencers")]
    pub top_influencers: usize,

    /// Days in the trailing volume average
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,

    #[serde(default = "default_top_sources")]
    pub top_sources: usize,

    #[serde(default = "default_top_hashtags")]
    pub top_hashtags: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            min_tweets: default_min_tweets(),
            top_influencers: default_top_influencers(),
            rolling_window: default_rolling_window(),
            top_sources: default_top_sources(),
            top_hashtags: default_top_hashtags(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct InputConfig {
    /// Tried once when the primary input cannot be read
    #[serde(default)]
    pub fallback: Option<String>,

    /// Single-character delimiter; sniffed from the header when unset
    #[serde(default)]
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentConfig {
    #[serde(default = "default_text_column")]
    pub text_column: String,

    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Score `|polarity|` below this as neutral
    #[serde(default = "default_neutral_band")]
    pub neutral_band: f64,

    #[serde(default)]
    pub clean: bool,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            text_column: default_text_column(),
            max_chars: default_max_chars(),
            neutral_band: default_neutral_band(),
            clean: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapConfig {
    /// Number of colour steps across the dominance scale
    #[serde(default = "default_levels")]
    pub levels: usize,

    #[serde(default = "default_top_states")]
    pub top_states: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            levels: default_levels(),
            top_states: default_top_states(),
        }
    }
}

pub fn default_low_quantile() -> f64 {
    0.40
}

pub fn default_high_quantile() -> f64 {
    0.80
}

pub fn default_min_tweets() -> usize {
    crate::report::influencers::DEFAULT_MIN_TWEETS
}

pub fn default_top_influencers() -> usize {
    crate::report::influencers::DEFAULT_TOP_N
}

pub fn default_rolling_window() -> usize {
    crate::report::temporal::DEFAULT_WINDOW
}

pub fn default_top_sources() -> usize {
    crate::report::sources::DEFAULT_TOP_SOURCES
}

pub fn default_top_hashtags() -> usize {
    crate::report::hashtags::DEFAULT_TOP_N
}

pub fn default_text_column() -> String {
    "tweet".to_string()
}

pub fn default_max_chars() -> usize {
    512
}

pub fn default_neutral_band() -> f64 {
    0.05
}

pub fn default_levels() -> usize {
    crate::report::dominance::DEFAULT_LEVELS
}

pub fn default_top_states() -> usize {
    10
}
