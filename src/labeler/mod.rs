//! Political alignment labeling.
//!
//! Scores every tweet, folds tweets into a per-user study and splits the
//! users into camps at two quantiles of their mean alignment.
//!
//! ```ignore
//! let mut labeler = PoliticalLabeler::new(table);
//! labeler.compute_alignment_scores().aggregate_users().define_camps(0.4, 0.8)?;
//! ```

mod aggregation;
mod alignment;
mod camps;

pub use aggregation::aggregate_users;
pub use alignment::{alignment_score, compute_alignment_scores};
pub use camps::{camp_sizes, compute_thresholds, define_camps, propagate_camps};

use crate::core::{CampThresholds, Result, TweetTable, UserAggregate};
use crate::observability::{set_phase, AnalysisPhase};

/// Owns the tweet table, the user study and the camp thresholds for one run.
#[derive(Debug, Clone, Default)]
pub struct PoliticalLabeler {
    table: TweetTable,
    users: Vec<UserAggregate>,
    thresholds: Option<CampThresholds>,
}

impl PoliticalLabeler {
    pub fn new(table: TweetTable) -> Self {
        Self {
            table,
            users: Vec::new(),
            thresholds: None,
        }
    }

    pub fn compute_alignment_scores(&mut self) -> &mut Self {
        let _phase = set_phase(AnalysisPhase::AlignmentScoring);
        compute_alignment_scores(&mut self.table);
        tracing::debug!("Scored {} tweets", self.table.len());
        self
    }

    pub fn aggregate_users(&mut self) -> &mut Self {
        let _phase = set_phase(AnalysisPhase::UserAggregation);
        self.users = aggregate_users(&self.table);
        tracing::info!(
            "Aggregated {} tweets into {} users",
            self.table.len(),
            self.users.len()
        );
        self
    }

    /// Classify users and copy their camp onto every tweet.
    pub fn define_camps(&mut self, low_q: f64, high_q: f64) -> Result<&mut Self> {
        self.classify(low_q, high_q)?;
        Ok(self)
    }

    /// Run all three stages with the given quantiles.
    pub fn run(&mut self, low_q: f64, high_q: f64) -> Result<CampThresholds> {
        self.compute_alignment_scores().aggregate_users();
        self.classify(low_q, high_q)
    }

    fn classify(&mut self, low_q: f64, high_q: f64) -> Result<CampThresholds> {
        let _phase = set_phase(AnalysisPhase::CampClassification);
        let thresholds = define_camps(&mut self.users, low_q, high_q)?;
        propagate_camps(&mut self.table, &self.users);
        self.thresholds = Some(thresholds);
        Ok(thresholds)
    }

    pub fn table(&self) -> &TweetTable {
        &self.table
    }

    pub fn users(&self) -> &[UserAggregate] {
        &self.users
    }

    pub fn thresholds(&self) -> Option<&CampThresholds> {
        self.thresholds.as_ref()
    }
}
