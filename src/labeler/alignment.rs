//! Per-tweet alignment scoring.

use crate::core::{columns, Candidate, Sentiment, TweetTable};

/// Signed alignment of one tweet: positive favours Trump, negative Biden.
///
/// | sentiment | trump    | biden    | other |
/// |-----------|----------|----------|-------|
/// | positive  | `+score` | `-score` | 0.0   |
/// | negative  | `-score` | `+score` | 0.0   |
/// | neutral   | 0.0      | 0.0      | 0.0   |
pub fn alignment_score(sentiment: Sentiment, candidate: Candidate, score: f64) -> f64 {
    if sentiment == Sentiment::Neutral {
        return 0.0;
    }
    let positive = sentiment == Sentiment::Positive;

    match candidate {
        Candidate::Trump if positive => score,
        Candidate::Trump => -score,
        Candidate::Biden if positive => -score,
        Candidate::Biden => score,
        Candidate::Other => 0.0,
    }
}

/// Write `alignment_score` onto every row. Missing scores count as 0.0.
pub fn compute_alignment_scores(table: &mut TweetTable) {
    for record in &mut table.records {
        let score = record.score.unwrap_or(0.0);
        record.alignment_score = Some(alignment_score(
            record.sentiment,
            record.candidate(),
            score,
        ));
    }
    table.ensure_column(columns::ALIGNMENT_SCORE);
}
