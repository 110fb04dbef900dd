//! Price alert rules
//!
//! A rule compares a competitor's current price with the last price seen
//! before the alert window, either as a percent move or an absolute move.

use crate::trend::change_rate;
use serde::{Deserialize, Serialize};

/// Which price moves a rule watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    PriceDrop,
    PriceIncrease,
    /// Either direction
    PriceChange,
}

/// Size of move that fires a rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertThreshold {
    /// Move of at least this many percent
    Percent(f64),
    /// Move of at least this many currency units
    Absolute(f64),
}

/// A configured price alert
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub kind: AlertKind,
    pub threshold: AlertThreshold,
}

impl AlertRule {
    pub fn new(kind: AlertKind, threshold: AlertThreshold) -> Self {
        Self { kind, threshold }
    }

    /// Whether moving from `previous` to `current` should notify
    ///
    /// Both prices must be positive; otherwise there is nothing to compare.
    pub fn should_notify(&self, previous: f64, current: f64) -> bool {
        if previous <= 0.0 || current <= 0.0 {
            return false;
        }

        let change_percent = change_rate(current, previous);
        let delta = current - previous;

        match self.kind {
            AlertKind::PriceDrop if change_percent < 0.0 => {
                self.exceeds(change_percent.abs(), delta.abs())
            }
            AlertKind::PriceIncrease if change_percent > 0.0 => {
                self.exceeds(change_percent, delta)
            }
            AlertKind::PriceChange => self.exceeds(change_percent.abs(), delta.abs()),
            _ => false,
        }
    }

    fn exceeds(&self, percent_move: f64, absolute_move: f64) -> bool {
        match self.threshold {
            AlertThreshold::Percent(limit) => percent_move >= limit,
            AlertThreshold::Absolute(limit) => absolute_move >= limit,
        }
    }
}
