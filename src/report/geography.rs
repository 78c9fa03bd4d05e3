//! Per-state tweet counts for US geography.

use crate::core::{columns, Error, Result, TweetTable};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// The 50 states plus the District of Columbia, upper-cased.
pub const US_STATES: [&str; 51] = [
    "ALABAMA",
    "ALASKA",
    "ARIZONA",
    "ARKANSAS",
    "CALIFORNIA",
    "COLORADO",
    "CONNECTICUT",
    "DELAWARE",
    "FLORIDA",
    "GEORGIA",
    "HAWAII",
    "IDAHO",
    "ILLINOIS",
    "INDIANA",
    "IOWA",
    "KANSAS",
    "KENTUCKY",
    "LOUISIANA",
    "MAINE",
    "MARYLAND",
    "MASSACHUSETTS",
    "MICHIGAN",
    "MINNESOTA",
    "MISSISSIPPI",
    "MISSOURI",
    "MONTANA",
    "NEBRASKA",
    "NEVADA",
    "NEW HAMPSHIRE",
    "NEW JERSEY",
    "NEW MEXICO",
    "NEW YORK",
    "NORTH CAROLINA",
    "NORTH DAKOTA",
    "OHIO",
    "OKLAHOMA",
    "OREGON",
    "PENNSYLVANIA",
    "RHODE ISLAND",
    "SOUTH CAROLINA",
    "SOUTH DAKOTA",
    "TENNESSEE",
    "TEXAS",
    "UTAH",
    "VERMONT",
    "VIRGINIA",
    "WASHINGTON",
    "WEST VIRGINIA",
    "WISCONSIN",
    "WYOMING",
    "DISTRICT OF COLUMBIA",
];

/// Case-insensitive membership in [`US_STATES`].
pub fn is_us_state(name: &str) -> bool {
    let upper = name.trim().to_uppercase();
    US_STATES.contains(&upper.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateCount {
    pub state: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateComparisonRow {
    pub state: String,
    /// Counts keyed by dataset label; absent states count 0
    pub counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateComparison {
    pub labels: Vec<String>,
    pub rows: Vec<StateComparisonRow>,
}

/// State-level view over one candidate's tweets.
#[derive(Debug, Clone)]
pub struct GeographyAnalysis {
    label: String,
    table: TweetTable,
}

impl GeographyAnalysis {
    /// Fails with `MissingColumn` when the table has no `state` column.
    pub fn new(table: &TweetTable, label: impl Into<String>) -> Result<Self> {
        if !table.has_column(columns::STATE) {
            return Err(Error::MissingColumn(columns::STATE.to_string()));
        }
        Ok(Self {
            label: label.into(),
            table: table.clone(),
        })
    }

    /// Analysis restricted to rows located in a US state.
    pub fn us_only(table: &TweetTable, label: impl Into<String>) -> Result<Self> {
        let analysis = Self::new(table, label)?;
        Ok(Self {
            table: analysis.filter_us_states(),
            label: analysis.label,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Rows whose `state` is one of the 50 states or DC.
    pub fn filter_us_states(&self) -> TweetTable {
        TweetTable::new(
            self.table.headers.clone(),
            self.table
                .records
                .iter()
                .filter(|r| r.text(columns::STATE).is_some_and(is_us_state))
                .cloned()
                .collect(),
        )
    }

    fn state_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for state in self
            .table
            .records
            .iter()
            .filter_map(|r| r.text(columns::STATE))
        {
            *counts.entry(state.trim()).or_insert(0) += 1;
        }
        counts
    }

    /// Tweets per state value, most frequent first, ties by name.
    pub fn tweets_per_state(&self, top_n: Option<usize>) -> Vec<StateCount> {
        let mut counts: Vec<StateCount> = self
            .state_counts()
            .into_iter()
            .map(|(state, count)| StateCount {
                state: state.to_string(),
                count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.state.cmp(&b.state)));
        if let Some(n) = top_n {
            counts.truncate(n);
        }
        counts
    }

    /// Outer join of both analyses' state counts, ordered by state name.
    ///
    /// With `top_n`, keeps the states with the largest combined counts.
    pub fn comparison_with(&self, other: &GeographyAnalysis, top_n: Option<usize>) -> StateComparison {
        let mine = self.state_counts();
        let theirs = other.state_counts();

        let mut states: Vec<&str> = mine.keys().chain(theirs.keys()).copied().collect();
        states.sort_unstable();
        states.dedup();

        let mut rows: Vec<StateComparisonRow> = states
            .into_iter()
            .map(|state| {
                let mut counts = BTreeMap::new();
                counts.insert(self.label.clone(), mine.get(state).copied().unwrap_or(0));
                counts.insert(other.label.clone(), theirs.get(state).copied().unwrap_or(0));
                StateComparisonRow {
                    state: state.to_string(),
                    counts,
                }
            })
            .collect();

        if let Some(n) = top_n {
            let total = |row: &StateComparisonRow| row.counts.values().sum::<usize>();
            let mut ranked: Vec<(usize, usize)> =
                rows.iter().enumerate().map(|(i, r)| (total(r), i)).collect();
            ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
            let mut keep: Vec<usize> = ranked.into_iter().take(n).map(|(_, i)| i).collect();
            keep.sort_unstable();
            rows = keep.into_iter().map(|i| rows[i].clone()).collect();
        }

        StateComparison {
            labels: vec![self.label.clone(), other.label.clone()],
            rows,
        }
    }
}
