//! Percent change and split-half trend analysis
//!
//! `analyze_trend` compares the mean of the first half of a chronological
//! sample with the mean of the second half. Moves beyond ±3% set the
//! direction and strength scales linearly up to a 20% move.

use price_math::{mean, round_to};
use serde::{Deserialize, Serialize};

pub use price_math::{exponential_moving_average, moving_average};

/// Percent move that separates a trend from noise
pub const DIRECTION_THRESHOLD_PERCENT: f64 = 3.0;
/// Percent move at which strength saturates at 1
pub const FULL_STRENGTH_PERCENT: f64 = 20.0;

/// Direction of a price trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    #[default]
    Stable,
}

/// Result of a split-half trend analysis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub direction: TrendDirection,
    /// 0 to 1, rounded to 2 decimals
    pub strength: f64,
    /// Second-half mean vs first-half mean in percent, rounded to 1 decimal
    pub change_percent: f64,
}

impl TrendResult {
    /// Whether the trend points `direction` with strength strictly above `min_strength`
    pub fn is_strong(&self, direction: TrendDirection, min_strength: f64) -> bool {
        self.direction == direction && self.strength > min_strength
    }
}

/// Percent change from `previous` to `current`; 0 when `previous` is 0
pub fn change_rate(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// Split-half trend of a chronologically ordered sample
pub fn analyze_trend(values: &[f64]) -> TrendResult {
    if values.len() < 2 {
        return TrendResult::default();
    }

    let (first_half, second_half) = values.split_at(values.len() / 2);
    let first_avg = mean(first_half);
    let second_avg = mean(second_half);

    if first_avg == 0.0 {
        return TrendResult::default();
    }

    let change_percent = (second_avg - first_avg) / first_avg * 100.0;

    let direction = if change_percent > DIRECTION_THRESHOLD_PERCENT {
        TrendDirection::Up
    } else if change_percent < -DIRECTION_THRESHOLD_PERCENT {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    let strength = (change_percent.abs() / FULL_STRENGTH_PERCENT).min(1.0);

    TrendResult {
        direction,
        strength: round_to(strength, 2),
        change_percent: round_to(change_percent, 1),
    }
}
