//! Forecast request handling
//!
//! `ForecastService` turns a procedure's raw price records into a
//! `ForecastReport`: records are reduced to effective prices, windowed to the
//! last 90 days, forecast, and labelled with a pricing strategy and a risk
//! level.

use crate::config::ForecastConfig;
use crate::data::{observations, prices, PriceRecord};
use crate::error::{ForecastError, Result};
use crate::forecaster::{BlendedForecaster, ForecastResult};
use crate::strategy::{classify_pricing_strategy, PricingStrategy};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Days of history a forecast looks back over, from the newest record
pub const HISTORY_WINDOW_DAYS: i64 = 90;
/// Horizon used when a request does not name one
pub const DEFAULT_FORECAST_DAYS: usize = 7;
/// Longest horizon a request may ask for
pub const MAX_FORECAST_DAYS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub procedure_id: i64,
    #[serde(default)]
    pub competitor_id: Option<i64>,
    #[serde(default)]
    pub days: Option<usize>,
}

impl ForecastRequest {
    pub fn new(procedure_id: i64) -> Self {
        Self {
            procedure_id,
            competitor_id: None,
            days: None,
        }
    }

    pub fn with_competitor(mut self, competitor_id: i64) -> Self {
        self.competitor_id = Some(competitor_id);
        self
    }

    pub fn with_days(mut self, days: usize) -> Self {
        self.days = Some(days);
        self
    }

    /// Requested horizon, defaulting to a week and kept within 7..=30 days
    pub fn clamped_days(&self) -> usize {
        self.days
            .unwrap_or(DEFAULT_FORECAST_DAYS)
            .clamp(DEFAULT_FORECAST_DAYS, MAX_FORECAST_DAYS)
    }
}

/// Price volatility risk derived from the trend strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_trend_strength(strength: f64) -> Self {
        if strength > 0.5 {
            RiskLevel::High
        } else if strength > 0.2 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub procedure_id: i64,
    pub competitor_id: Option<i64>,
    /// Observations used after windowing
    pub data_points: usize,
    pub forecast: ForecastResult,
    pub strategy: PricingStrategy,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Default)]
pub struct ForecastService {
    forecaster: BlendedForecaster,
}

impl ForecastService {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        Ok(Self {
            forecaster: BlendedForecaster::new(config)?,
        })
    }

    /// Forecast the procedure described by `request` from `records`
    ///
    /// Records without a positive price are ignored. Fails with
    /// `InsufficientData` when fewer than `min_history` priced records fall
    /// inside the history window.
    pub fn run(&self, request: &ForecastRequest, records: &[PriceRecord]) -> Result<ForecastReport> {
        let mut history = observations(records);
        history.sort_by_key(|obs| obs.timestamp);

        if let Some(newest) = history.last().map(|obs| obs.timestamp) {
            let window_start = newest - Duration::days(HISTORY_WINDOW_DAYS);
            history.retain(|obs| obs.timestamp >= window_start);
        }

        let required = self.forecaster.config().min_history;
        if history.len() < required {
            return Err(ForecastError::InsufficientData {
                required,
                actual: history.len(),
            });
        }

        let days = request.clamped_days();
        let forecast = self.forecaster.forecast(&history, days);
        let strategy = classify_pricing_strategy(&prices(&history));
        let risk_level = RiskLevel::from_trend_strength(forecast.trend_strength);

        info!(
            procedure_id = request.procedure_id,
            data_points = history.len(),
            days,
            %strategy,
            "Forecast generated"
        );

        Ok(ForecastReport {
            procedure_id: request.procedure_id,
            competitor_id: request.competitor_id,
            data_points: history.len(),
            forecast,
            strategy,
            risk_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;

    fn day(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap() + Duration::days(offset)
    }

    fn record(offset: i64, regular: Option<f64>, event: Option<f64>) -> PriceRecord {
        PriceRecord {
            timestamp: day(offset),
            regular_price: regular,
            event_price: event,
        }
    }

    #[rstest]
    #[case(None, 7)]
    #[case(Some(1), 7)]
    #[case(Some(14), 14)]
    #[case(Some(90), 30)]
    fn test_clamped_days(#[case] days: Option<usize>, #[case] expected: usize) {
        let request = ForecastRequest {
            procedure_id: 1,
            competitor_id: None,
            days,
        };
        assert_eq!(request.clamped_days(), expected);
    }

    #[rstest]
    #[case(0.0, RiskLevel::Low)]
    #[case(0.2, RiskLevel::Low)]
    #[case(0.21, RiskLevel::Medium)]
    #[case(0.5, RiskLevel::Medium)]
    #[case(0.8, RiskLevel::High)]
    fn test_risk_level(#[case] strength: f64, #[case] expected: RiskLevel) {
        assert_eq!(RiskLevel::from_trend_strength(strength), expected);
    }

    #[test]
    fn test_unpriced_records_do_not_count() {
        let records = [
            record(0, Some(100.0), None),
            record(1, None, None),
            record(2, Some(0.0), None),
            record(3, Some(110.0), None),
        ];
        let err = ForecastService::default()
            .run(&ForecastRequest::new(5), &records)
            .unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData { required: 3, actual: 2 }
        ));
    }

    #[test]
    fn test_old_records_fall_out_of_window() {
        let records = [
            record(0, Some(100.0), None),
            record(1, Some(100.0), None),
            record(200, Some(100.0), None),
            record(201, Some(100.0), None),
        ];
        let err = ForecastService::default()
            .run(&ForecastRequest::new(5), &records)
            .unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientData { actual: 2, .. }));
    }

    #[test]
    fn test_report_for_event_prices() {
        let records: Vec<PriceRecord> = (0..10)
            .map(|i| record(i, Some(150.0), Some(120.0)))
            .collect();
        let report = ForecastService::default()
            .run(&ForecastRequest::new(5).with_competitor(9).with_days(3), &records)
            .unwrap();

        assert_eq!(report.procedure_id, 5);
        assert_eq!(report.competitor_id, Some(9));
        assert_eq!(report.data_points, 10);
        assert_eq!(report.forecast.len(), 7);
        assert_eq!(report.forecast.predictions[0].predicted_price, 120.0);
        assert_eq!(report.strategy, PricingStrategy::Stable);
        assert_eq!(report.risk_level, RiskLevel::Low);
    }
}
