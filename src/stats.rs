//! Small descriptive statistics used by the labeling pipeline.
//!
//! Quantiles use linear interpolation between closest ranks, the same
//! convention as numpy/pandas defaults, so thresholds are comparable with
//! results produced by notebook-style tooling.

use std::cmp::Ordering;

/// Sort finite values ascending, dropping NaN.
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Quantile `q` in [0, 1] of an already sorted slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Quantile of unsorted values; NaN entries are ignored.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    quantile_sorted(&sorted_finite(values), q)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Undefined below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Trailing rolling mean with `min_periods = 1`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Count values into `bins` equal-width buckets over `[min, max]`.
/// Values outside the range are clamped into the edge buckets.
pub fn histogram(values: &[f64], bins: usize, min: f64, max: f64) -> Vec<usize> {
    let bins = bins.max(1);
    let mut counts = vec![0; bins];
    let width = (max - min) / bins as f64;

    for value in values.iter().filter(|v| v.is_finite()) {
        let index = if width > 0.0 {
            ((value - min) / width).floor().max(0.0) as usize
        } else {
            0
        };
        counts[index.min(bins - 1)] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let scores = [-0.8, 0.1, 0.9];
        assert!(approx(quantile(&scores, 0.40).unwrap(), -0.08));
        assert!(approx(quantile(&scores, 0.80).unwrap(), 0.58));
        assert!(approx(quantile(&scores, 0.0).unwrap(), -0.8));
        assert!(approx(quantile(&scores, 1.0).unwrap(), 0.9));
    }

    #[test]
    fn test_quantile_ignores_order_and_nan() {
        let scores = [0.9, f64::NAN, -0.8, 0.1];
        assert!(approx(quantile(&scores, 0.5).unwrap(), 0.1));
    }

    #[test]
    fn test_quantile_rejects_empty_and_out_of_range() {
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&[1.0], 1.5), None);
        assert_eq!(quantile(&[1.0], -0.1), None);
    }

    #[test]
    fn test_sample_std_dev() {
        assert_eq!(sample_std_dev(&[0.5]), None);
        let std = sample_std_dev(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!(approx(std, 1.2909944487358056));
    }

    #[test]
    fn test_rolling_mean_min_periods_one() {
        let counts = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0];
        let rolled = rolling_mean(&counts, 7);
        assert!(rolled[..7].iter().all(|v| approx(*v, 1.0)));
        assert!(approx(rolled[7], 6.0 / 7.0));
    }

    #[test]
    fn test_rolling_mean_partial_window() {
        let rolled = rolling_mean(&[2.0, 4.0], 7);
        assert_eq!(rolled, vec![2.0, 3.0]);
    }

    #[test]
    fn test_histogram_clamps_edges() {
        let counts = histogram(&[0.0, 0.05, 0.55, 1.0, 1.2], 10, 0.0, 1.0);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[5], 1);
        assert_eq!(counts[9], 2);
        assert_eq!(counts.iter().sum::<usize>(), 5);
    }

    proptest! {
        #[test]
        fn quantiles_are_monotonic(
            values in proptest::collection::vec(-1.0..1.0f64, 1..50),
            a in 0.0..1.0f64,
            b in 0.0..1.0f64,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let low = quantile(&values, lo).unwrap();
            let high = quantile(&values, hi).unwrap();
            prop_assert!(low <= high + 1e-12);
        }

        #[test]
        fn quantile_stays_within_range(
            values in proptest::collection::vec(-1.0..1.0f64, 1..50),
            q in 0.0..1.0f64,
        ) {
            let sorted = sorted_finite(&values);
            let value = quantile_sorted(&sorted, q).unwrap();
            prop_assert!(value >= sorted[0] - 1e-12);
            prop_assert!(value <= sorted[sorted.len() - 1] + 1e-12);
        }
    }
}
