//! Descriptive statistics over price samples
//!
//! Contains:
//! - Arithmetic mean
//! - Population standard deviation
//! - Linear-interpolation percentile
//! - Coefficient of variation
//! - A `StatisticsSummary` bundling mean, deviation, range and count
//!
//! None of these fail. An empty sample yields zeros and a single value has
//! zero deviation, so callers only need to look at `count` or `std_dev`
//! before interpreting a result.

use serde::{Deserialize, Serialize};

/// Arithmetic mean, or 0 for an empty sample
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `count`)
///
/// Pass `mean_override` when the mean is already known to avoid a second
/// pass. Returns 0 when fewer than two values are given.
pub fn std_dev(values: &[f64], mean_override: Option<f64>) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let avg = mean_override.unwrap_or_else(|| mean(values));
    let variance = values
        .iter()
        .map(|&value| {
            let diff = value - avg;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;

    variance.sqrt()
}

/// Percentile `p` (0-100) with linear interpolation between closest ranks
///
/// Works on a sorted copy; returns 0 for an empty sample.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        return sorted[lower];
    }

    sorted[lower] + (sorted[upper] - sorted[lower]) * (rank - lower as f64)
}

/// Coefficient of variation (`std_dev / mean`), 0 when the mean is 0
pub fn coefficient_of_variation(summary: &StatisticsSummary) -> f64 {
    if summary.mean == 0.0 {
        return 0.0;
    }
    summary.std_dev / summary.mean
}

/// Summary of a sample; shorthand for `StatisticsSummary::from_values`
pub fn summarize(values: &[f64]) -> StatisticsSummary {
    StatisticsSummary::from_values(values)
}

/// Summary statistics over a finite sample
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Number of values
    pub count: usize,
}

impl StatisticsSummary {
    /// Compute the summary of a sample
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // Summation error can push the mean of near-identical values one ulp outside the range
        let avg = mean(values).clamp(min, max);

        Self {
            mean: avg,
            std_dev: std_dev(values, Some(avg)),
            min,
            max,
            count: values.len(),
        }
    }

    /// Whether the sample is empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_empty_sample_is_all_zero() {
        let summary = StatisticsSummary::from_values(&[]);
        assert_eq!(summary, StatisticsSummary::default());
        assert_eq!(summary.count, 0);
        assert!(summary.is_empty());
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[], None), 0.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(summarize(&[]), summary);
    }

    #[test]
    fn test_single_value_has_no_deviation() {
        let summary = StatisticsSummary::from_values(&[42_000.0]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.mean, 42_000.0);
        assert_eq!(summary.min, 42_000.0);
        assert_eq!(summary.max, 42_000.0);
    }

    #[test]
    fn test_population_std_dev() {
        // Classic population example: mean 5, deviation 2
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0);
        assert_relative_eq!(std_dev(&values, None), 2.0);
        assert_relative_eq!(std_dev(&values, Some(5.0)), 2.0);
    }

    #[test]
    fn test_mean_stays_within_range() {
        let samples: [&[f64]; 4] = [
            &[0.1, 0.1, 0.1],
            &[1.0, 1000.0, 3.5],
            &[99_000.0, 101_000.0, 100_500.0, 98_700.0],
            &[7.0],
        ];
        for values in samples {
            let summary = StatisticsSummary::from_values(values);
            assert!(summary.min <= summary.mean && summary.mean <= summary.max);
        }
    }

    #[rstest]
    #[case(0.0, 10.0)]
    #[case(100.0, 40.0)]
    #[case(50.0, 25.0)]
    #[case(25.0, 17.5)]
    #[case(90.0, 37.0)]
    fn test_percentile_interpolates(#[case] p: f64, #[case] expected: f64) {
        // Unsorted on purpose; sorted it is [10, 20, 30, 40]
        let values = [30.0, 10.0, 40.0, 20.0];
        assert_relative_eq!(percentile(&values, p), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_percentile_leaves_input_untouched() {
        let values = vec![3.0, 1.0, 2.0];
        let _ = percentile(&values, 50.0);
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_coefficient_of_variation_guards_zero_mean() {
        let zero = StatisticsSummary::from_values(&[0.0, 0.0]);
        assert_eq!(coefficient_of_variation(&zero), 0.0);

        let summary = StatisticsSummary::from_values(&[90.0, 110.0]);
        assert_relative_eq!(coefficient_of_variation(&summary), 0.1);
    }
}
