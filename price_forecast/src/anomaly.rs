//! Z-score anomaly detection
//!
//! A value is anomalous when it lies more than `threshold` standard
//! deviations from the sample mean. A sample with zero deviation never
//! produces an anomaly.

use crate::config::{AnomalyConfig, DEFAULT_ANOMALY_THRESHOLD};
use price_math::{round_to, StatisticsSummary};
use serde::{Deserialize, Serialize};

/// Side of the mean an anomalous value falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyDirection {
    High,
    Low,
    Normal,
}

/// How loudly an anomaly should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

/// Outcome of testing one value against a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyResult {
    /// Tested value
    pub value: f64,
    /// Standard deviations from the mean, rounded to 2 decimals
    pub z_score: f64,
    /// Whether |z| exceeded the threshold
    pub is_anomaly: bool,
    pub direction: AnomalyDirection,
}

impl AnomalyResult {
    /// Severity under the given thresholds, `None` for normal values
    pub fn severity(&self, config: &AnomalyConfig) -> Option<Severity> {
        if !self.is_anomaly {
            return None;
        }
        if self.z_score.abs() > config.critical_threshold {
            Some(Severity::Critical)
        } else {
            Some(Severity::Warning)
        }
    }
}

/// Test `value` against `stats` with the given z-score threshold
pub fn detect_anomaly(value: f64, stats: &StatisticsSummary, threshold: f64) -> AnomalyResult {
    if stats.std_dev == 0.0 {
        return AnomalyResult {
            value,
            z_score: 0.0,
            is_anomaly: false,
            direction: AnomalyDirection::Normal,
        };
    }

    let z_score = (value - stats.mean) / stats.std_dev;
    let is_anomaly = z_score.abs() > threshold;
    let direction = match (is_anomaly, z_score > 0.0) {
        (false, _) => AnomalyDirection::Normal,
        (true, true) => AnomalyDirection::High,
        (true, false) => AnomalyDirection::Low,
    };

    AnomalyResult {
        value,
        z_score: round_to(z_score, 2),
        is_anomaly,
        direction,
    }
}

/// `detect_anomaly` with the default threshold of 2
pub fn detect_anomaly_default(value: f64, stats: &StatisticsSummary) -> AnomalyResult {
    detect_anomaly(value, stats, DEFAULT_ANOMALY_THRESHOLD)
}
