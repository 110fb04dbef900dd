//! Half-up decimal rounding
//!
//! Results are presented with a fixed precision per metric (whole currency
//! units for prices, two decimals for confidences and z-scores, one decimal
//! for percentages). Halves always round toward positive infinity, so
//! `-2.5` becomes `-2` and `2.5` becomes `3`.

/// Round `value` to `decimals` places, halves rounding up
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}
