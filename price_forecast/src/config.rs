//! Tunable thresholds and weights for the analytics engine
//!
//! Every default reproduces the dashboard's fixed constants, so
//! `AnalyticsConfig::default()` behaves exactly like the free functions.
//! Configurations can be loaded from JSON; missing fields take their default.

use crate::error::{ForecastError, Result};
use price_math::moving_averages::ExponentialMovingAverage;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Default z-score above which a value is an anomaly
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.0;
/// Default z-score above which an anomaly is critical
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 3.0;

/// Anomaly detection thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnomalyConfig {
    /// |z| above this is flagged
    pub threshold: f64,
    /// |z| above this is reported as critical rather than warning
    pub critical_threshold: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_ANOMALY_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
        }
    }
}

impl AnomalyConfig {
    /// Create a validated anomaly configuration
    pub fn new(threshold: f64, critical_threshold: f64) -> Result<Self> {
        let config = Self {
            threshold,
            critical_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that both thresholds are positive and ordered
    pub fn validate(&self) -> Result<()> {
        if self.threshold.is_nan() || self.threshold <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "Anomaly threshold must be greater than zero".to_string(),
            ));
        }
        if self.critical_threshold.is_nan() || self.critical_threshold < self.threshold {
            return Err(ForecastError::InvalidParameter(format!(
                "Critical threshold ({}) must not be below the anomaly threshold ({})",
                self.critical_threshold, self.threshold
            )));
        }
        Ok(())
    }
}

/// Weights and decay rates of the blended forecaster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForecastConfig {
    /// Weight of the regression line; the EMA projection gets the rest
    pub linear_weight: f64,
    /// Upper bound on the EMA period (the period is `min(this, n)`)
    pub max_ema_period: usize,
    /// Observations needed before any prediction is made
    pub min_history: usize,
    /// Fraction of confidence lost by the last forecast day
    pub confidence_decay: f64,
    /// History length at which the data-size factor reaches 1
    pub full_confidence_points: usize,
    /// Growth of the error margin per forecast day, as a fraction of std dev
    pub margin_growth: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            linear_weight: 0.3,
            max_ema_period: 7,
            min_history: 3,
            confidence_decay: 0.3,
            full_confidence_points: 30,
            margin_growth: 0.1,
        }
    }
}

impl ForecastConfig {
    /// Weight of the EMA projection
    pub fn ema_weight(&self) -> f64 {
        1.0 - self.linear_weight
    }

    /// Check weights and periods
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.linear_weight) {
            return Err(ForecastError::InvalidParameter(
                "Linear weight must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence_decay) {
            return Err(ForecastError::InvalidParameter(
                "Confidence decay must be between 0 and 1".to_string(),
            ));
        }
        if self.margin_growth.is_nan() || self.margin_growth < 0.0 {
            return Err(ForecastError::InvalidParameter(
                "Margin growth cannot be negative".to_string(),
            ));
        }
        if self.min_history < 2 {
            return Err(ForecastError::InvalidParameter(
                "Minimum history must be at least 2 observations".to_string(),
            ));
        }
        if self.full_confidence_points == 0 {
            return Err(ForecastError::InvalidParameter(
                "Full confidence point count must be greater than zero".to_string(),
            ));
        }
        ExponentialMovingAverage::new(self.max_ema_period)?;
        Ok(())
    }
}

/// Limits of the anomaly scan report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportConfig {
    /// Groups with fewer prices are skipped
    pub min_group_size: usize,
    /// Maximum number of anomalies listed
    pub max_reported: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            min_group_size: 3,
            max_reported: 20,
        }
    }
}

impl ReportConfig {
    /// Check the group size can support a deviation
    pub fn validate(&self) -> Result<()> {
        if self.min_group_size < 2 {
            return Err(ForecastError::InvalidParameter(
                "Minimum group size must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub anomaly: AnomalyConfig,
    pub forecast: ForecastConfig,
    pub report: ReportConfig,
}

impl AnalyticsConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&contents)?;
        info!(path = %path.as_ref().display(), "Configuration loaded");
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.anomaly.validate()?;
        self.forecast.validate()?;
        self.report.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.anomaly.threshold, 2.0);
        assert_eq!(config.anomaly.critical_threshold, 3.0);
        assert_eq!(config.forecast.linear_weight, 0.3);
        assert_eq!(config.forecast.ema_weight(), 0.7);
        assert_eq!(config.forecast.max_ema_period, 7);
        assert_eq!(config.forecast.min_history, 3);
        assert_eq!(config.report.max_reported, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            AnalyticsConfig::from_json_str(r#"{ "anomaly": { "threshold": 2.5 } }"#).unwrap();
        assert_eq!(config.anomaly.threshold, 2.5);
        assert_eq!(config.anomaly.critical_threshold, 3.0);
        assert_eq!(config.forecast, ForecastConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(AnomalyConfig::new(0.0, 3.0).is_err());
        assert!(AnomalyConfig::new(3.0, 2.0).is_err());
        assert!(AnomalyConfig::new(2.0, f64::NAN).is_err());
        assert!(AnomalyConfig::new(f64::NAN, 3.0).is_err());

        let config = ForecastConfig {
            margin_growth: f64::NAN,
            ..ForecastConfig::default()
        };
        assert!(matches!(config.validate(), Err(ForecastError::InvalidParameter(_))));

        let result = AnalyticsConfig::from_json_str(r#"{ "forecast": { "maxEmaPeriod": 0 } }"#);
        assert!(matches!(result, Err(ForecastError::Math(_))));

        let result = AnalyticsConfig::from_json_str(r#"{ "forecast": { "linearWeight": 1.5 } }"#);
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = AnalyticsConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ForecastError::Json(_))));
    }
}
