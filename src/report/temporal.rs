//! Daily tweet volume per camp with a trailing rolling mean.

use super::Section;
use crate::core::{columns, Camp, TweetTable};
use crate::stats;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_WINDOW: usize = 7;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Calendar day of a timestamp. Accepts RFC 3339, Twitter API
/// (`Wed Oct 21 12:00:00 +0000 2020`) and common ISO-like layouts.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%a %b %d %H:%M:%S %z %Y") {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
    {
        return Some(dt.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampSeries {
    pub camp: Camp,
    /// Tweets per day, aligned with [`TemporalVolume::days`]
    pub counts: Vec<usize>,
    pub rolling_mean: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalVolume {
    pub date_column: String,
    pub window: usize,
    pub days: Vec<NaiveDate>,
    pub series: Vec<CampSeries>,
    /// Rows whose date could not be parsed
    pub dropped: usize,
}

/// Count labeled tweets per day and camp over the continuous day range.
///
/// Only camps with at least one dated tweet get a series.
pub fn temporal_volume(table: &TweetTable, window: usize) -> Section<TemporalVolume> {
    let Some(date_column) = table.find_column(&columns::DATE_CANDIDATES) else {
        return Section::skipped(format!(
            "Temporal volume: no date column ({})",
            columns::DATE_CANDIDATES.join(", ")
        ));
    };

    let mut per_camp: BTreeMap<Camp, BTreeMap<NaiveDate, usize>> = BTreeMap::new();
    let mut dropped = 0;

    for record in &table.records {
        let Some(camp) = record.camp else {
            continue;
        };
        match record.text(date_column).and_then(parse_date) {
            Some(day) => *per_camp.entry(camp).or_default().entry(day).or_insert(0) += 1,
            None => dropped += 1,
        }
    }

    let first = per_camp.values().filter_map(|d| d.keys().next()).min().copied();
    let last = per_camp.values().filter_map(|d| d.keys().next_back()).max().copied();
    let (Some(first), Some(last)) = (first, last) else {
        return Section::skipped(format!(
            "Temporal volume: no parseable dates in '{}'",
            date_column
        ));
    };

    let days: Vec<NaiveDate> = first.iter_days().take_while(|d| *d <= last).collect();
    let window = window.max(1);

    let series = per_camp
        .into_iter()
        .map(|(camp, by_day)| {
            let counts: Vec<usize> = days
                .iter()
                .map(|d| by_day.get(d).copied().unwrap_or(0))
                .collect();
            let as_f64: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
            CampSeries {
                camp,
                rolling_mean: stats::rolling_mean(&as_f64, window),
                counts,
            }
        })
        .collect();

    if dropped > 0 {
        tracing::debug!("Dropped {} rows with unparseable '{}'", dropped, date_column);
    }

    Section::ready(TemporalVolume {
        date_column: date_column.to_string(),
        window,
        days,
        series,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TweetRecord;

    fn dated(camp: Camp, date: &str) -> TweetRecord {
        let mut r = TweetRecord::new("u");
        r.camp = Some(camp);
        r.extra.insert("created_at".into(), date.into());
        r
    }

    fn table(records: Vec<TweetRecord>) -> TweetTable {
        let mut table = TweetTable::from_records(records);
        table.ensure_column("created_at");
        table
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 10, 21);
        assert_eq!(parse_date("2020-10-21 13:05:00"), expected);
        assert_eq!(parse_date("2020-10-21T13:05:00Z"), expected);
        assert_eq!(parse_date("2020-10-21"), expected);
        assert_eq!(parse_date("Wed Oct 21 13:05:00 +0000 2020"), expected);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_rolling_mean_over_gap() {
        let mut records: Vec<TweetRecord> = (1..=7)
            .map(|d| dated(Camp::Trump, &format!("2020-10-{d:02}")))
            .collect();
        // day 8 has no tweets, day 9 closes the range
        records.push(dated(Camp::Biden, "2020-10-09"));

        let volume = temporal_volume(&table(records), 7);
        let volume = volume.data().unwrap();
        assert_eq!(volume.days.len(), 9);

        let trump = volume.series.iter().find(|s| s.camp == Camp::Trump).unwrap();
        assert_eq!(trump.counts, vec![1, 1, 1, 1, 1, 1, 1, 0, 0]);
        assert!(trump.rolling_mean[..7].iter().all(|v| (v - 1.0).abs() < 1e-12));
        assert!((trump.rolling_mean[7] - 6.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_unparseable_dates_dropped() {
        let records = vec![
            dated(Camp::Neutral, "2020-11-01"),
            dated(Camp::Neutral, "garbage"),
        ];
        let volume = temporal_volume(&table(records), 7);
        let volume = volume.data().unwrap();
        assert_eq!(volume.dropped, 1);
        assert_eq!(volume.series[0].counts, vec![1]);
    }

    #[test]
    fn test_missing_date_column_is_skipped() {
        let section = temporal_volume(&TweetTable::from_records(vec![]), 7);
        assert!(section.skip_reason().unwrap().contains("no date column"));
    }

    #[test]
    fn test_no_parseable_dates_is_skipped() {
        let section = temporal_volume(&table(vec![dated(Camp::Biden, "??")]), 7);
        assert!(section.skip_reason().is_some());
    }
}
