//! Anomaly scan across procedure/competitor price groups
//!
//! Each group's newest price is tested against the statistics of the whole
//! group. Anomalies are ranked by |z| and the list is truncated, while the
//! totals still count every anomaly found.

use crate::anomaly::{detect_anomaly, AnomalyDirection, Severity};
use crate::config::{AnomalyConfig, ReportConfig};
use crate::error::Result;
use price_math::{round_to, StatisticsSummary};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Recent prices of one procedure at one competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceGroup {
    pub procedure_id: i64,
    pub competitor_id: i64,
    /// Prices, newest first; non-positive entries are placeholders and ignored
    pub prices: Vec<f64>,
}

/// One flagged price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyDetail {
    pub procedure_id: i64,
    pub competitor_id: i64,
    pub current_price: f64,
    /// Group mean, rounded to a whole unit
    pub average_price: f64,
    pub z_score: f64,
    /// Current price vs group mean in percent, rounded to 1 decimal
    pub change_percent: f64,
    pub direction: AnomalyDirection,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyReport {
    pub total_anomalies: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    /// Strongest anomalies first, at most `max_reported`
    pub anomalies: Vec<AnomalyDetail>,
}

/// Scanner applying anomaly and report settings to price groups
#[derive(Debug, Clone, Default)]
pub struct AnomalyScanner {
    anomaly: AnomalyConfig,
    report: ReportConfig,
}

impl AnomalyScanner {
    /// Create a scanner with validated thresholds and limits
    pub fn new(anomaly: AnomalyConfig, report: ReportConfig) -> Result<Self> {
        anomaly.validate()?;
        report.validate()?;
        Ok(Self { anomaly, report })
    }

    /// Test the newest positive price of one group
    pub fn inspect(&self, group: &PriceGroup) -> Option<AnomalyDetail> {
        let prices: Vec<f64> = group.prices.iter().copied().filter(|&p| p > 0.0).collect();
        if prices.len() < self.report.min_group_size {
            return None;
        }

        let current_price = *prices.first()?;
        let stats = StatisticsSummary::from_values(&prices);
        let result = detect_anomaly(current_price, &stats, self.anomaly.threshold);
        let severity = result.severity(&self.anomaly)?;

        debug!(
            procedure_id = group.procedure_id,
            competitor_id = group.competitor_id,
            z_score = result.z_score,
            "Price anomaly detected"
        );

        Some(AnomalyDetail {
            procedure_id: group.procedure_id,
            competitor_id: group.competitor_id,
            current_price,
            average_price: round_to(stats.mean, 0),
            z_score: result.z_score,
            change_percent: round_to((current_price - stats.mean) / stats.mean * 100.0, 1),
            direction: result.direction,
            severity,
        })
    }

    /// Scan all groups and rank the anomalies
    pub fn scan(&self, groups: &[PriceGroup]) -> AnomalyReport {
        let mut anomalies: Vec<AnomalyDetail> =
            groups.iter().filter_map(|group| self.inspect(group)).collect();

        anomalies.sort_by(|a, b| b.z_score.abs().total_cmp(&a.z_score.abs()));

        let critical_count = anomalies
            .iter()
            .filter(|a| a.severity == Severity::Critical)
            .count();
        let total_anomalies = anomalies.len();

        info!(
            groups = groups.len(),
            total_anomalies, critical_count, "Anomaly scan finished"
        );

        anomalies.truncate(self.report.max_reported);

        AnomalyReport {
            total_anomalies,
            critical_count,
            warning_count: total_anomalies - critical_count,
            anomalies,
        }
    }
}

/// Scan with the default thresholds and limits
pub fn scan_anomalies(groups: &[PriceGroup]) -> AnomalyReport {
    AnomalyScanner::default().scan(groups)
}
