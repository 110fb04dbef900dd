//! Short-horizon price forecasting
//!
//! The forecaster blends two projections of the sorted price history:
//!
//! - a least-squares trend line extended past the last index
//! - the last exponential moving average, advanced by the regression slope
//!
//! Confidence decays toward the horizon and is capped by how much history
//! exists. The error band is the sample standard deviation, widening each
//! day. Predicted prices are not clamped at zero, so a long enough decline
//! can forecast negative prices.

use crate::config::ForecastConfig;
use crate::data::PriceObservation;
use crate::error::Result;
use crate::trend::{analyze_trend, TrendDirection};
use chrono::{Duration, NaiveDate};
use price_math::{exponential_moving_average, linear_regression, mean, round_to, StatisticsSummary};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Forecast for one future day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePrediction {
    /// Last observed date plus the day offset
    pub date: NaiveDate,
    /// Blended forecast, rounded to a whole unit
    pub predicted_price: f64,
    /// 0 to 1, rounded to 2 decimals
    pub confidence: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Forecast over a horizon together with the trend of the history
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    /// One prediction per day, in day order
    pub predictions: Vec<PricePrediction>,
    pub trend: TrendDirection,
    pub trend_strength: f64,
    /// Mean confidence of all predictions, rounded to 2 decimals
    pub average_confidence: f64,
}

impl ForecastResult {
    /// Whether enough history existed to forecast
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Number of forecast days
    pub fn len(&self) -> usize {
        self.predictions.len()
    }
}

/// Regression/EMA blend forecaster
#[derive(Debug, Clone, Default)]
pub struct BlendedForecaster {
    config: ForecastConfig,
}

impl BlendedForecaster {
    /// Create a forecaster with validated settings
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast `days` days past the latest observation in `history`
    ///
    /// `history` does not need to be sorted. With fewer than `min_history`
    /// observations the result is empty with a stable, zero-strength trend.
    pub fn forecast(&self, history: &[PriceObservation], days: usize) -> ForecastResult {
        if history.len() < self.config.min_history {
            debug!(
                observations = history.len(),
                required = self.config.min_history,
                "Not enough history to forecast"
            );
            return ForecastResult::default();
        }

        let mut sorted = history.to_vec();
        sorted.sort_by_key(|obs| obs.timestamp);
        let prices: Vec<f64> = sorted.iter().map(|obs| obs.price).collect();
        let n = prices.len();

        let fit = linear_regression(&prices);
        let ema_period = self.config.max_ema_period.min(n);
        let recent_ema = exponential_moving_average(&prices, ema_period)
            .last()
            .copied()
            .unwrap_or(0.0);

        let stats = StatisticsSummary::from_values(&prices);
        let trend = analyze_trend(&prices);

        let last_timestamp = sorted[n - 1].timestamp;
        let data_size_factor = (n as f64 / self.config.full_confidence_points as f64).min(1.0);
        let linear_weight = self.config.linear_weight;
        let ema_weight = self.config.ema_weight();

        let predictions: Vec<PricePrediction> = (1..=days)
            .map(|day| {
                let step = day as f64;
                let linear_prediction = fit.predict((n + day - 1) as f64);
                let ema_prediction = recent_ema + fit.slope * step;
                let blended = linear_prediction * linear_weight + ema_prediction * ema_weight;

                let day_factor = 1.0 - (step / days as f64) * self.config.confidence_decay;
                let margin = stats.std_dev * (1.0 + step * self.config.margin_growth);

                PricePrediction {
                    date: (last_timestamp + Duration::days(day as i64)).date_naive(),
                    predicted_price: round_to(blended, 0),
                    confidence: round_to(day_factor * data_size_factor, 2),
                    lower_bound: round_to(blended - margin, 0),
                    upper_bound: round_to(blended + margin, 0),
                }
            })
            .collect();

        if let Some(first_negative) = predictions.iter().find(|p| p.predicted_price < 0.0) {
            warn!(
                date = %first_negative.date,
                predicted_price = first_negative.predicted_price,
                "Forecast falls below zero"
            );
        }

        let confidences: Vec<f64> = predictions.iter().map(|p| p.confidence).collect();

        ForecastResult {
            predictions,
            trend: trend.direction,
            trend_strength: trend.strength,
            average_confidence: round_to(mean(&confidences), 2),
        }
    }
}

/// Forecast with the default blend weights
pub fn generate_forecast(history: &[PriceObservation], days: usize) -> ForecastResult {
    BlendedForecaster::default().forecast(history, days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::days(offset)
    }

    fn series(prices: &[f64]) -> Vec<PriceObservation> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PriceObservation::new(day(i as i64), price))
            .collect()
    }

    #[test]
    fn test_two_points_is_empty() {
        let result = generate_forecast(&series(&[100.0, 120.0]), 7);
        assert!(result.is_empty());
        assert_eq!(result.trend, TrendDirection::Stable);
        assert_eq!(result.trend_strength, 0.0);
        assert_eq!(result.average_confidence, 0.0);
    }

    #[test]
    fn test_flat_history() {
        let result = generate_forecast(&series(&[80_000.0; 6]), 3);
        assert_eq!(result.len(), 3);
        for prediction in &result.predictions {
            assert_eq!(prediction.predicted_price, 80_000.0);
            assert_eq!(prediction.lower_bound, 80_000.0);
            assert_eq!(prediction.upper_bound, 80_000.0);
        }
        assert_eq!(result.trend, TrendDirection::Stable);
    }

    #[test]
    fn test_dates_follow_last_observation() {
        let result = generate_forecast(&series(&[10.0, 11.0, 12.0]), 2);
        assert_eq!(result.predictions[0].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(result.predictions[1].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn test_zero_days() {
        let result = generate_forecast(&series(&[10.0, 11.0, 12.0]), 0);
        assert!(result.is_empty());
        assert_eq!(result.average_confidence, 0.0);
    }

    #[test]
    fn test_custom_min_history() {
        let config = ForecastConfig {
            min_history: 5,
            ..ForecastConfig::default()
        };
        let forecaster = BlendedForecaster::new(config).unwrap();
        assert!(forecaster.forecast(&series(&[1.0, 2.0, 3.0, 4.0]), 7).is_empty());
        assert_eq!(forecaster.forecast(&series(&[1.0, 2.0, 3.0, 4.0, 5.0]), 7).len(), 7);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ForecastConfig {
            linear_weight: -0.1,
            ..ForecastConfig::default()
        };
        assert!(BlendedForecaster::new(config).is_err());
    }
}
