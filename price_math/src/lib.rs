//! # Price Math
//!
//! Numeric building blocks for price analytics.
//! This crate provides descriptive statistics, smoothing filters and
//! least-squares regression over plain `f64` samples.
//!
//! The batch functions (`mean`, `std_dev`, `percentile`, `moving_average`,
//! `exponential_moving_average`, `linear_regression`) are total: empty or
//! degenerate input resolves to a zero value instead of an error. Only the
//! streaming indicators validate their parameters and report missing data.

use thiserror::Error;

pub mod moving_averages;
pub mod regression;
pub mod rounding;
pub mod statistics;

pub use moving_averages::{exponential_moving_average, moving_average};
pub use regression::{linear_regression, LinearFit};
pub use rounding::round_to;
pub use statistics::{
    coefficient_of_variation, mean, percentile, std_dev, summarize, StatisticsSummary,
};

/// Errors that can occur in the streaming indicators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for price math operations
pub type Result<T> = std::result::Result<T, MathError>;
