//! Month-of-year seasonality
//!
//! A month is a peak when its average price sits more than half a standard
//! deviation above the mean of all monthly averages, and a low when it sits
//! more than half a deviation below. Seasonality needs at least one of each.

use crate::data::PriceObservation;
use chrono::Datelike;
use price_math::StatisticsSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fewest monthly averages that can show a seasonal pattern
pub const MIN_MONTHS: usize = 6;

/// Average price of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPrice {
    /// Calendar month, 1 to 12
    pub month: u32,
    pub avg_price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalityResult {
    pub has_seasonality: bool,
    pub peak_months: Vec<u32>,
    pub low_months: Vec<u32>,
}

/// Find peak and low months in a set of monthly averages
pub fn detect_seasonality(monthly: &[MonthlyPrice]) -> SeasonalityResult {
    if monthly.len() < MIN_MONTHS {
        return SeasonalityResult::default();
    }

    let averages: Vec<f64> = monthly.iter().map(|m| m.avg_price).collect();
    let stats = StatisticsSummary::from_values(&averages);
    let band = stats.std_dev * 0.5;

    let mut peak_months = Vec::new();
    let mut low_months = Vec::new();

    for entry in monthly {
        if entry.avg_price > stats.mean + band {
            peak_months.push(entry.month);
        } else if entry.avg_price < stats.mean - band {
            low_months.push(entry.month);
        }
    }

    SeasonalityResult {
        has_seasonality: !peak_months.is_empty() && !low_months.is_empty(),
        peak_months,
        low_months,
    }
}

/// Average observed price per calendar month, ordered by month
///
/// Observations from different years fall into the same month bucket.
pub fn monthly_averages(observations: &[PriceObservation]) -> Vec<MonthlyPrice> {
    let mut buckets: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for obs in observations {
        let bucket = buckets.entry(obs.timestamp.month()).or_insert((0.0, 0));
        bucket.0 += obs.price;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(month, (sum, count))| MonthlyPrice {
            month,
            avg_price: sum / count as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn months(prices: &[f64]) -> Vec<MonthlyPrice> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &avg_price)| MonthlyPrice {
                month: i as u32 + 1,
                avg_price,
            })
            .collect()
    }

    #[test]
    fn test_needs_six_months() {
        let result = detect_seasonality(&months(&[100.0, 200.0, 50.0, 100.0, 100.0]));
        assert_eq!(result, SeasonalityResult::default());
    }

    #[test]
    fn test_peak_and_low_months() {
        let result =
            detect_seasonality(&months(&[100.0, 100.0, 130.0, 100.0, 70.0, 100.0, 100.0]));
        assert_eq!(
            result,
            SeasonalityResult {
                has_seasonality: true,
                peak_months: vec![3],
                low_months: vec![5],
            }
        );
    }

    #[test]
    fn test_flat_year_has_no_seasonality() {
        let result = detect_seasonality(&months(&[100.0; 12]));
        assert!(!result.has_seasonality);
        assert!(result.peak_months.is_empty());
        assert!(result.low_months.is_empty());
    }

    #[test]
    fn test_peak_without_low_is_not_seasonal() {
        let result = detect_seasonality(&months(&[100.0, 100.0, 100.0, 100.0, 100.0, 160.0]));
        assert_eq!(result.peak_months, vec![6]);
        assert!(result.low_months.is_empty());
        assert!(!result.has_seasonality);
    }

    #[test]
    fn test_monthly_averages_merge_years() {
        let observations = [
            PriceObservation::new(Utc.with_ymd_and_hms(2023, 3, 2, 0, 0, 0).unwrap(), 90.0),
            PriceObservation::new(Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap(), 110.0),
            PriceObservation::new(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(), 80.0),
        ];
        assert_eq!(
            monthly_averages(&observations),
            vec![
                MonthlyPrice { month: 1, avg_price: 80.0 },
                MonthlyPrice { month: 3, avg_price: 100.0 },
            ]
        );
    }
}
