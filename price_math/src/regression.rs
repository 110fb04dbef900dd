//! Ordinary least-squares trend line
//!
//! Fits `value ≈ intercept + slope * index` over zero-based indices.

use crate::statistics::mean;
use serde::{Deserialize, Serialize};

/// Slope and intercept of a fitted trend line
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LinearFit {
    /// Change per index step
    pub slope: f64,
    /// Fitted value at index 0
    pub intercept: f64,
}

impl LinearFit {
    /// Fitted value at `index`
    pub fn predict(&self, index: f64) -> f64 {
        self.intercept + self.slope * index
    }
}

/// Fit a least-squares line through `values` against their indices
///
/// With fewer than two values the slope is 0 and the intercept is the only
/// value (or 0 for an empty sample).
pub fn linear_regression(values: &[f64]) -> LinearFit {
    let n = values.len();
    if n < 2 {
        return LinearFit {
            slope: 0.0,
            intercept: values.first().copied().unwrap_or(0.0),
        };
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    let slope = if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    };

    LinearFit {
        slope,
        intercept: y_mean - slope * x_mean,
    }
}
