//! Report sections built from a labeled run.
//!
//! Each section carries the data behind one chart of the study. A section
//! whose input columns are absent is [`Section::Skipped`] with a reason
//! instead of failing the run.

pub mod dominance;
pub mod geography;
pub mod hashtags;
pub mod influencers;
pub mod sentiment_compare;
pub mod sources;
pub mod temporal;

pub use dominance::{DominanceMap, DominanceRow};
pub use geography::{GeographyAnalysis, StateComparison, StateCount};
pub use hashtags::{CampHashtags, HashtagCount};
pub use influencers::{CampInfluencers, Influencer};
pub use sentiment_compare::{
    compare_sentiment, CandidateSentiment, IntensitySummary, SentimentComparison, SentimentShare,
};
pub use sources::{SourceDistribution, SourceRow};
pub use temporal::{CampSeries, TemporalVolume};

use crate::core::{Camp, CampThresholds, UserAggregate};
use crate::labeler::{camp_sizes, PoliticalLabeler};
use crate::observability::{set_current_section, set_phase, AnalysisPhase};
use serde::Serialize;

/// A report section that may be unavailable for the given input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Ready { data: T },
    Skipped { reason: String },
}

impl<T> Section<T> {
    pub fn ready(data: T) -> Self {
        Self::Ready { data }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready { data } => Some(data),
            Self::Skipped { .. } => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&str> {
        match self {
            Self::Ready { .. } => None,
            Self::Skipped { reason } => Some(reason),
        }
    }
}

/// Tunables for [`build_label_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub min_tweets: usize,
    pub top_influencers: usize,
    pub rolling_window: usize,
    pub top_sources: usize,
    pub top_hashtags: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            min_tweets: influencers::DEFAULT_MIN_TWEETS,
            top_influencers: influencers::DEFAULT_TOP_N,
            rolling_window: temporal::DEFAULT_WINDOW,
            top_sources: sources::DEFAULT_TOP_SOURCES,
            top_hashtags: hashtags::DEFAULT_TOP_N,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CampSize {
    pub camp: Camp,
    pub users: usize,
}

/// Everything `tweetalign label` prints.
#[derive(Debug, Clone, Serialize)]
pub struct LabelReport {
    pub total_tweets: usize,
    pub total_users: usize,
    pub thresholds: CampThresholds,
    pub camps: Vec<CampSize>,
    pub influencers: Vec<CampInfluencers>,
    pub temporal_volume: Section<TemporalVolume>,
    pub sources: Section<SourceDistribution>,
    pub hashtags: Vec<CampHashtags>,
    pub diagnostics: Vec<String>,
}

/// Build the label report from a labeler whose camps are defined.
pub fn build_label_report(
    labeler: &PoliticalLabeler,
    thresholds: CampThresholds,
    options: &ReportOptions,
) -> LabelReport {
    let _phase = set_phase(AnalysisPhase::Reporting);
    let table = labeler.table();
    let users: &[UserAggregate] = labeler.users();
    let mut diagnostics = Vec::new();

    let influencers = {
        let _section = set_current_section("influencers");
        influencers::influencers_by_camp(users, options.min_tweets, options.top_influencers)
    };
    for group in &influencers {
        if group.influencers.is_empty() {
            diagnostics.push(format!(
                "No {} users with at least {} tweets",
                group.camp, options.min_tweets
            ));
        }
    }

    let temporal_volume = {
        let _section = set_current_section("temporal_volume");
        temporal::temporal_volume(table, options.rolling_window)
    };
    let sources = {
        let _section = set_current_section("sources");
        sources::source_distribution(table, options.top_sources)
    };
    for reason in [temporal_volume.skip_reason(), sources.skip_reason()]
        .into_iter()
        .flatten()
    {
        tracing::warn!("Skipping report section: {}", reason);
        diagnostics.push(reason.to_string());
    }

    let hashtags = {
        let _section = set_current_section("hashtags");
        hashtags::hashtags_by_camp(users, options.top_hashtags)
    };

    LabelReport {
        total_tweets: table.len(),
        total_users: users.len(),
        thresholds,
        camps: camp_sizes(users)
            .into_iter()
            .map(|(camp, users)| CampSize { camp, users })
            .collect(),
        influencers,
        temporal_volume,
        sources,
        hashtags,
        diagnostics,
    }
}

/// Output of `tweetalign geo`.
#[derive(Debug, Clone, Serialize)]
pub struct GeoReport {
    pub states: Section<StateComparison>,
    pub dominance: Section<DominanceMap>,
    pub diagnostics: Vec<String>,
}

/// Per-state and per-country comparison of two candidate datasets.
pub fn build_geo_report(
    trump: &crate::core::TweetTable,
    biden: &crate::core::TweetTable,
    top_n: Option<usize>,
    levels: usize,
) -> GeoReport {
    let _phase = set_phase(AnalysisPhase::Reporting);

    let states = {
        let _section = set_current_section("states");
        match (
            GeographyAnalysis::us_only(trump, "Trump"),
            GeographyAnalysis::us_only(biden, "Biden"),
        ) {
            (Ok(trump), Ok(biden)) => Section::ready(trump.comparison_with(&biden, top_n)),
            (Err(e), _) | (_, Err(e)) => Section::skipped(format!("State comparison: {}", e)),
        }
    };

    let dominance = {
        let _section = set_current_section("dominance");
        dominance::dominance_map(trump, biden, levels)
    };

    let diagnostics: Vec<String> = [states.skip_reason(), dominance.skip_reason()]
        .into_iter()
        .flatten()
        .map(|reason| {
            tracing::warn!("Skipping report section: {}", reason);
            reason.to_string()
        })
        .collect();

    GeoReport {
        states,
        dominance,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::loader::parse_table;
    use indoc::indoc;

    #[test]
    fn test_section_accessors() {
        let ready: Section<u8> = Section::ready(3);
        assert_eq!(ready.data(), Some(&3));
        assert_eq!(ready.skip_reason(), None);

        let skipped: Section<u8> = Section::skipped("no column");
        assert_eq!(skipped.data(), None);
        assert_eq!(skipped.skip_reason(), Some("no column"));
    }

    #[test]
    fn test_section_serializes_with_status_tag() {
        let json = serde_json::to_value(Section::<u8>::skipped("gone")).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["reason"], "gone");
    }

    #[test]
    fn test_label_report_skips_missing_columns() {
        let csv = indoc! {"
            user_id,candidate,sentiment,score,tweet
            1,trump,positive,0.9,#MAGA now
            2,biden,positive,0.9,#Biden2020
            3,trump,neutral,0.5,hello
        "};
        let mut labeler = PoliticalLabeler::new(parse_table(csv.as_bytes(), None).unwrap());
        let thresholds = labeler.run(0.4, 0.8).unwrap();

        let report = build_label_report(&labeler, thresholds, &ReportOptions::default());
        assert_eq!(report.total_tweets, 3);
        assert_eq!(report.total_users, 3);
        assert!(report.temporal_volume.skip_reason().is_some());
        assert!(report.sources.skip_reason().is_some());
        // min_tweets defaults to 3; every camp is empty
        assert!(report.influencers.iter().all(|g| g.influencers.is_empty()));
        assert_eq!(report.diagnostics.len(), 5);
    }
}
