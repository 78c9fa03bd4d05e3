//! Posting client (`source`) breakdown per camp.

use super::Section;
use crate::core::{columns, Camp, TweetTable};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_TOP_SOURCES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRow {
    pub source: String,
    pub total: usize,
    pub by_camp: BTreeMap<Camp, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceDistribution {
    pub sources: Vec<SourceRow>,
}

/// The `top_n` most frequent sources with their tweet counts per camp.
pub fn source_distribution(table: &TweetTable, top_n: usize) -> Section<SourceDistribution> {
    if !table.has_column(columns::SOURCE) {
        return Section::skipped("Source distribution: no 'source' column");
    }

    let mut order: Vec<&str> = Vec::new();
    let mut rows: HashMap<&str, SourceRow> = HashMap::new();

    for record in &table.records {
        let Some(source) = record.text(columns::SOURCE).map(str::trim) else {
            continue;
        };
        let row = rows.entry(source).or_insert_with(|| {
            order.push(source);
            SourceRow {
                source: source.to_string(),
                total: 0,
                by_camp: BTreeMap::new(),
            }
        });
        row.total += 1;
        if let Some(camp) = record.camp {
            *row.by_camp.entry(camp).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<SourceRow> = order
        .into_iter()
        .filter_map(|source| rows.remove(source))
        .collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total));
    ranked.truncate(top_n);

    Section::ready(SourceDistribution { sources: ranked })
}
