//! Pricing-strategy labels and competitor positioning
//!
//! `classify_pricing_strategy` labels a competitor's price history from its
//! dispersion and trend. The remaining helpers score a competitor against
//! the market average the way the competitor and package screens do.

use crate::trend::{analyze_trend, TrendDirection};
use price_math::{coefficient_of_variation, round_to, StatisticsSummary};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fewest prices needed to label a strategy
pub const MIN_STRATEGY_SAMPLES: usize = 5;
/// Dispersion above which pricing counts as variable
pub const VARIABLE_CV: f64 = 0.15;
/// Trend strength needed for a directional label
pub const DIRECTIONAL_STRENGTH: f64 = 0.3;

/// How a competitor prices over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingStrategy {
    /// Cutting prices
    Aggressive,
    Stable,
    /// Raising prices
    Premium,
    /// Erratic, dispersed prices
    Variable,
}

impl fmt::Display for PricingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PricingStrategy::Aggressive => "aggressive",
            PricingStrategy::Stable => "stable",
            PricingStrategy::Premium => "premium",
            PricingStrategy::Variable => "variable",
        };
        f.write_str(label)
    }
}

/// Label a chronological price history
///
/// Dispersion is checked first: a cv above 0.15 is `Variable` whatever the
/// trend. Fewer than five prices are `Stable`.
pub fn classify_pricing_strategy(prices: &[f64]) -> PricingStrategy {
    if prices.len() < MIN_STRATEGY_SAMPLES {
        return PricingStrategy::Stable;
    }

    let stats = StatisticsSummary::from_values(prices);
    let trend = analyze_trend(prices);

    if coefficient_of_variation(&stats) > VARIABLE_CV {
        PricingStrategy::Variable
    } else if trend.is_strong(TrendDirection::Down, DIRECTIONAL_STRENGTH) {
        PricingStrategy::Aggressive
    } else if trend.is_strong(TrendDirection::Up, DIRECTIONAL_STRENGTH) {
        PricingStrategy::Premium
    } else {
        PricingStrategy::Stable
    }
}

/// Where a price sits relative to the market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketPosition {
    /// More than 10% under the market average
    Discount,
    Competitive,
    /// More than 10% over the market average
    Premium,
}

impl MarketPosition {
    pub fn from_diff(diff_percent: f64) -> Self {
        if diff_percent < -10.0 {
            MarketPosition::Discount
        } else if diff_percent > 10.0 {
            MarketPosition::Premium
        } else {
            MarketPosition::Competitive
        }
    }
}

/// Percent difference of `price` from `market_avg`; 0 when there is no market average
pub fn relative_price_diff(price: f64, market_avg: f64) -> f64 {
    if market_avg <= 0.0 {
        return 0.0;
    }
    (price - market_avg) / market_avg * 100.0
}

/// Threat score of a competitor, 1 to 10
///
/// Starts at 5 and adds for deep discounts (average diff under -15%), a
/// falling trend, an aggressive strategy and a broad catalogue (over 20
/// procedures).
pub fn threat_score(
    avg_price_diff: f64,
    trend: TrendDirection,
    strategy: PricingStrategy,
    procedure_count: usize,
) -> f64 {
    let mut score: f64 = 5.0;
    if avg_price_diff < -15.0 {
        score += 2.0;
    }
    if trend == TrendDirection::Down {
        score += 1.5;
    }
    if strategy == PricingStrategy::Aggressive {
        score += 1.5;
    }
    if procedure_count > 20 {
        score += 0.5;
    }
    score.clamp(1.0, 10.0)
}

/// Gross margin of `price` over `cost` in whole percent; 0 for a non-positive price
pub fn margin_percent(price: f64, cost: f64) -> f64 {
    if price <= 0.0 {
        return 0.0;
    }
    round_to((price - cost) / price * 100.0, 0)
}
