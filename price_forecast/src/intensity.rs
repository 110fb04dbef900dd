//! Competitive-intensity score
//!
//! Tightly clustered competitor prices signal price matching, so the score
//! falls linearly with the coefficient of variation: cv 0 scores 10 and
//! cv 0.5 or more scores 0.

use price_math::{coefficient_of_variation, round_to, StatisticsSummary};

/// Highest possible intensity
pub const MAX_INTENSITY: f64 = 10.0;

/// Intensity score in `[0, 10]`, rounded to 1 decimal
///
/// Returns 0 for fewer than two prices or a zero mean.
pub fn competitive_intensity(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let stats = StatisticsSummary::from_values(prices);
    if stats.mean == 0.0 {
        return 0.0;
    }

    let cv = coefficient_of_variation(&stats);
    let intensity = ((1.0 - cv * 2.0) * MAX_INTENSITY).clamp(0.0, MAX_INTENSITY);

    round_to(intensity, 1)
}
