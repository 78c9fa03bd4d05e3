//! Sentiment proportions and intensity, Trump dataset against Biden dataset.

use crate::core::{Candidate, Sentiment, TweetTable};
use crate::stats;
use serde::Serialize;

pub const HISTOGRAM_BINS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentShare {
    pub sentiment: Sentiment,
    pub count: usize,
    /// Share of the candidate's tweets, in percent
    pub percent: f64,
}

/// Confidence distribution for one polarity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensitySummary {
    pub sentiment: Sentiment,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Counts over [0, 1] in equal-width bins
    pub histogram: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSentiment {
    pub candidate: Candidate,
    pub tweets: usize,
    pub shares: Vec<SentimentShare>,
    pub intensity: Vec<IntensitySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentComparison {
    pub candidates: Vec<CandidateSentiment>,
}

impl SentimentComparison {
    pub fn get(&self, candidate: Candidate) -> Option<&CandidateSentiment> {
        self.candidates.iter().find(|c| c.candidate == candidate)
    }
}

pub fn candidate_sentiment(candidate: Candidate, table: &TweetTable) -> CandidateSentiment {
    let total = table.len();

    let shares = Sentiment::ALL
        .iter()
        .map(|&sentiment| {
            let count = table
                .records
                .iter()
                .filter(|r| r.sentiment == sentiment)
                .count();
            let percent = if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            };
            SentimentShare {
                sentiment,
                count,
                percent,
            }
        })
        .collect();

    let intensity = [Sentiment::Positive, Sentiment::Negative]
        .iter()
        .map(|&sentiment| {
            let scores: Vec<f64> = table
                .records
                .iter()
                .filter(|r| r.sentiment == sentiment)
                .filter_map(|r| r.score)
                .collect();
            IntensitySummary {
                sentiment,
                count: scores.len(),
                mean: stats::mean(&scores),
                median: stats::median(&scores),
                histogram: stats::histogram(&scores, HISTOGRAM_BINS, 0.0, 1.0),
            }
        })
        .collect();

    CandidateSentiment {
        candidate,
        tweets: total,
        shares,
        intensity,
    }
}

pub fn compare_sentiment(trump: &TweetTable, biden: &TweetTable) -> SentimentComparison {
    SentimentComparison {
        candidates: vec![
            candidate_sentiment(Candidate::Trump, trump),
            candidate_sentiment(Candidate::Biden, biden),
        ],
    }
}
