//! Error types for the price_forecast crate
//!
//! The analytics functions themselves never fail; these errors come from
//! configuration, input loading and the forecast request boundary.

use price_math::MathError;
use thiserror::Error;

/// Custom error types for the price_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A tunable or request parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Too few observations for a meaningful result
    #[error("Insufficient data: need at least {required} data points, have {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Error from the numeric primitives
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from JSON (de)serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
