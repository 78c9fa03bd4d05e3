use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Canonical column names understood by the loader and the writers.
pub mod columns {
    pub const USER_ID: &str = "user_id";
    pub const USER_NAME: &str = "user_name";
    pub const USER_FOLLOWERS_COUNT: &str = "user_followers_count";
    pub const CANDIDATE: &str = "candidate";
    pub const SENTIMENT: &str = "sentiment";
    pub const SCORE: &str = "score";
    pub const LIKES: &str = "likes";
    pub const RETWEET_COUNT: &str = "retweet_count";
    pub const TWEET: &str = "tweet";
    pub const TWEET_ORIGINAL: &str = "tweet_original";
    pub const ALIGNMENT_SCORE: &str = "alignment_score";
    pub const CAMP: &str = "camp";
    pub const SOURCE: &str = "source";
    pub const STATE: &str = "state";
    pub const COUNTRY: &str = "country";

    /// Date-like columns, in lookup order.
    pub const DATE_CANDIDATES: [&str; 3] = ["created_at", "tweet_created", "date"];
}

/// Sentiment polarity as produced by the sentiment model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    /// Parse a model label. Anything unrecognised is treated as neutral.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "positive" | "pos" => Self::Positive,
            "negative" | "neg" => Self::Negative,
            _ => Self::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Political figure a tweet was collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Candidate {
    Trump,
    Biden,
    #[default]
    Other,
}

impl Candidate {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "trump" => Self::Trump,
            "biden" => Self::Biden,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trump => "trump",
            Self::Biden => "biden",
            Self::Other => "other",
        }
    }
}

/// Camp a user is classified into from their mean alignment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Camp {
    Biden,
    Trump,
    Neutral,
}

impl Camp {
    pub const ALL: [Camp; 3] = [Camp::Biden, Camp::Trump, Camp::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Biden => "Biden",
            Self::Trump => "Trump",
            Self::Neutral => "Neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "biden" => Some(Self::Biden),
            "trump" => Some(Self::Trump),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Camp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the input table.
///
/// Columns the pipeline reasons about are typed; everything else is kept
/// verbatim in `extra` so writers can reproduce the input alongside the
/// derived columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TweetRecord {
    pub user_id: String,
    pub user_name: Option<String>,
    pub user_followers_count: Option<f64>,
    /// Raw candidate label as read; see [`TweetRecord::candidate`].
    pub candidate_label: String,
    pub sentiment: Sentiment,
    /// Sentiment confidence in [0, 1].
    pub score: Option<f64>,
    pub likes: Option<f64>,
    pub retweet_count: Option<f64>,
    pub tweet: Option<String>,
    pub tweet_original: Option<String>,
    pub extra: BTreeMap<String, String>,
    pub alignment_score: Option<f64>,
    pub camp: Option<Camp>,
}

impl TweetRecord {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn candidate(&self) -> Candidate {
        Candidate::from_label(&self.candidate_label)
    }

    /// Free text for a column, typed or extra.
    pub fn text(&self, column: &str) -> Option<&str> {
        match column {
            columns::TWEET => self.tweet.as_deref(),
            columns::TWEET_ORIGINAL => self.tweet_original.as_deref(),
            columns::USER_NAME => self.user_name.as_deref(),
            _ => self.extra.get(column).map(String::as_str),
        }
        .filter(|s| !s.trim().is_empty())
    }

    /// Cell value for any column, formatted for CSV output.
    pub fn value(&self, column: &str) -> Cow<'_, str> {
        fn number(value: Option<f64>) -> Cow<'static, str> {
            value.map(|v| Cow::Owned(v.to_string())).unwrap_or(Cow::Borrowed(""))
        }
        fn text(value: &Option<String>) -> Cow<'_, str> {
            value.as_deref().map(Cow::Borrowed).unwrap_or(Cow::Borrowed(""))
        }

        match column {
            columns::USER_ID => Cow::Borrowed(&self.user_id),
            columns::USER_NAME => text(&self.user_name),
            columns::USER_FOLLOWERS_COUNT => number(self.user_followers_count),
            columns::CANDIDATE => Cow::Borrowed(&self.candidate_label),
            columns::SENTIMENT => Cow::Borrowed(self.sentiment.as_str()),
            columns::SCORE => number(self.score),
            columns::LIKES => number(self.likes),
            columns::RETWEET_COUNT => number(self.retweet_count),
            columns::TWEET => text(&self.tweet),
            columns::TWEET_ORIGINAL => text(&self.tweet_original),
            columns::ALIGNMENT_SCORE => number(self.alignment_score),
            columns::CAMP => self
                .camp
                .map(|c| Cow::Borrowed(c.as_str()))
                .unwrap_or(Cow::Borrowed("")),
            other => self
                .extra
                .get(other)
                .map(|v| Cow::Borrowed(v.as_str()))
                .unwrap_or(Cow::Borrowed("")),
        }
    }
}

/// In-memory tweet table: the input header list plus parsed rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TweetTable {
    pub headers: Vec<String>,
    pub records: Vec<TweetRecord>,
}

impl TweetTable {
    pub fn new(headers: Vec<String>, records: Vec<TweetRecord>) -> Self {
        Self { headers, records }
    }

    /// Build a table from records alone, with the canonical headers.
    pub fn from_records(records: Vec<TweetRecord>) -> Self {
        let headers = [
            columns::USER_ID,
            columns::USER_NAME,
            columns::USER_FOLLOWERS_COUNT,
            columns::CANDIDATE,
            columns::SENTIMENT,
            columns::SCORE,
            columns::LIKES,
            columns::RETWEET_COUNT,
            columns::TWEET,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        Self { headers, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// First column of `candidates` present in the table.
    pub fn find_column<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        candidates.iter().copied().find(|c| self.has_column(c))
    }

    /// Append a derived column header if it is not already present.
    pub fn ensure_column(&mut self, column: &str) {
        if !self.has_column(column) {
            self.headers.push(column.to_string());
        }
    }
}

/// Per-user aggregate ("user study" row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAggregate {
    pub user_id: String,
    pub user_name: Option<String>,
    pub user_followers_count: Option<f64>,
    pub likes: f64,
    pub retweet_count: f64,
    pub tweet_count: usize,
    /// Mean alignment score across the user's tweets.
    pub alignment_score: f64,
    /// Sample standard deviation of alignment scores; `None` for single-tweet users.
    pub stability: Option<f64>,
    #[serde(skip)]
    pub corpus: String,
    pub camp: Option<Camp>,
}

/// Quantile cutoffs separating the camps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CampThresholds {
    pub low: f64,
    pub high: f64,
    pub low_quantile: f64,
    pub high_quantile: f64,
}

impl CampThresholds {
    /// Boundary-inclusive classification; the Biden test wins when both hold.
    pub fn classify(&self, score: f64) -> Camp {
        if score <= self.low {
            Camp::Biden
        } else if score >= self.high {
            Camp::Trump
        } else {
            Camp::Neutral
        }
    }
}
