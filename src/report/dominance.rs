//! Per-country relative dominance of Biden over Trump.
//!
//! `rel_diff = (B - T) / (B + T)` lies in [-1, 1]; positive means Biden
//! dominates. Values are binned into a step colour scale running from red
//! through white to blue, symmetric around zero.

use super::Section;
use crate::core::{columns, TweetTable};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_LEVELS: usize = 22;
pub const UNDEFINED_COLOR: &str = "#ffffff";

const MIN_MAX_ABS: f64 = 1e-6;

const RED: Rgb = Rgb(255, 0, 0);
const WHITE: Rgb = Rgb(255, 255, 255);
const BLUE: Rgb = Rgb(0, 0, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rgb(u8, u8, u8);

impl Rgb {
    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// `None` when neither candidate has tweets for the country.
pub fn rel_diff(biden: usize, trump: usize) -> Option<f64> {
    let total = biden + trump;
    if total == 0 {
        return None;
    }
    Some((biden as f64 - trump as f64) / total as f64)
}

/// Step colour scale over `[-max_abs, max_abs]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorScale {
    pub max_abs: f64,
    /// `levels + 1` bin edges, ascending
    pub bins: Vec<f64>,
    /// One colour per bin
    pub colors: Vec<String>,
}

impl ColorScale {
    pub fn new(max_abs: f64, levels: usize) -> Self {
        let levels = levels.max(1);
        let max_abs = if max_abs.is_finite() {
            max_abs.max(MIN_MAX_ABS)
        } else {
            1.0
        };
        let step = 2.0 * max_abs / levels as f64;
        let bins: Vec<f64> = (0..=levels).map(|i| -max_abs + step * i as f64).collect();

        // Each bin's colour is sampled at a point sliding from its lower
        // edge (first bin) towards its upper edge (last bin).
        let n = bins.len() as f64;
        let colors = (0..levels)
            .map(|i| {
                let t = i as f64 / (n - 1.0);
                let value = bins[i] * (1.0 - t) + bins[i + 1] * t;
                linear_color(value, max_abs).hex()
            })
            .collect();

        Self {
            max_abs,
            bins,
            colors,
        }
    }

    /// Colour of a value; undefined values are white.
    pub fn color_for(&self, value: Option<f64>) -> &str {
        let Some(value) = value.filter(|v| v.is_finite()) else {
            return UNDEFINED_COLOR;
        };
        let last = self.colors.len() - 1;
        let index = self
            .bins
            .windows(2)
            .position(|edge| value >= edge[0] && value < edge[1])
            .unwrap_or(if value < self.bins[0] { 0 } else { last });
        &self.colors[index]
    }
}

fn linear_color(value: f64, max_abs: f64) -> Rgb {
    let t = ((value + max_abs) / (2.0 * max_abs)).clamp(0.0, 1.0);
    if t <= 0.5 {
        RED.lerp(WHITE, t * 2.0)
    } else {
        WHITE.lerp(BLUE, (t - 0.5) * 2.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DominanceRow {
    pub country: String,
    pub biden: usize,
    pub trump: usize,
    pub rel_diff: Option<f64>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DominanceMap {
    pub scale: ColorScale,
    pub rows: Vec<DominanceRow>,
}

impl DominanceMap {
    /// Build from per-country `(biden, trump)` counts.
    pub fn from_counts(counts: &BTreeMap<String, (usize, usize)>, levels: usize) -> Self {
        let diffs: Vec<(&String, usize, usize, Option<f64>)> = counts
            .iter()
            .map(|(country, &(b, t))| (country, b, t, rel_diff(b, t)))
            .collect();

        let max_abs = diffs
            .iter()
            .filter_map(|d| d.3)
            .map(f64::abs)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            .unwrap_or(1.0);
        let scale = ColorScale::new(max_abs, levels);

        let rows = diffs
            .into_iter()
            .map(|(country, biden, trump, rel_diff)| DominanceRow {
                country: country.clone(),
                biden,
                trump,
                rel_diff,
                color: scale.color_for(rel_diff).to_string(),
            })
            .collect();

        Self { scale, rows }
    }
}

fn country_counts(table: &TweetTable) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for country in table.records.iter().filter_map(|r| r.text(columns::COUNTRY)) {
        *counts.entry(country.trim()).or_insert(0) += 1;
    }
    counts
}

/// Country values are used verbatim (trimmed); no name normalisation.
pub fn dominance_map(trump: &TweetTable, biden: &TweetTable, levels: usize) -> Section<DominanceMap> {
    if !trump.has_column(columns::COUNTRY) || !biden.has_column(columns::COUNTRY) {
        return Section::skipped("World dominance: no 'country' column in both datasets");
    }

    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for (country, n) in country_counts(biden) {
        counts.entry(country.to_string()).or_default().0 += n;
    }
    for (country, n) in country_counts(trump) {
        counts.entry(country.to_string()).or_default().1 += n;
    }

    Section::ready(DominanceMap::from_counts(&counts, levels))
}
