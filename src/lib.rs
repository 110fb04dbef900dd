//! # Price Insight
//!
//! Workspace facade over the price analytics crates.
//!
//! - [`math`]: statistics, smoothing and regression primitives (`price_math`)
//! - [`forecast`]: trends, anomalies, forecasts and pricing labels (`price_forecast`)
//!
//! ```
//! use price_insight_workspace::forecast::{analyze_trend, TrendDirection};
//!
//! let trend = analyze_trend(&[100.0, 101.0, 102.0]);
//! assert_eq!(trend.direction, TrendDirection::Stable);
//! ```

pub use price_forecast as forecast;
pub use price_math as math;
