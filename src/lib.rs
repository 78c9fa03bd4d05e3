// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatting;
pub mod io;
pub mod labeler;
pub mod observability;
pub mod progress;
pub mod report;
pub mod sentiment;
pub mod stats;
pub mod text;

// Re-export commonly used types
pub use crate::core::{
    Camp, CampThresholds, Candidate, Error, Result, Sentiment, TweetRecord, TweetTable,
    UserAggregate,
};

pub use crate::labeler::{
    aggregate_users, alignment_score, compute_alignment_scores, compute_thresholds, define_camps,
    propagate_camps, PoliticalLabeler,
};

pub use crate::report::{
    build_geo_report, build_label_report, compare_sentiment, GeoReport, LabelReport,
    ReportOptions, Section, SentimentComparison,
};

pub use crate::sentiment::{LexiconModel, Prediction, SentimentAnalysis, SentimentModel};

pub use crate::io::loader::{load_table, parse_table, LoadOptions};
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
