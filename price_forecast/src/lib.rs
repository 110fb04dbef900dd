//! # Price Forecast
//!
//! Competitor price analytics and short-horizon forecasting.
//!
//! ## Features
//!
//! - Trend direction and strength of a price history
//! - Z-score anomaly detection and ranked anomaly scans
//! - Regression/EMA blended forecasts with confidence bands
//! - Month-of-year seasonality
//! - Competitive intensity of a market's prices
//! - Pricing-strategy labels, market position and threat scores
//! - Price alert rules and period-aggregated trend series
//! - Weekly market summaries and per-category competition analysis
//!
//! All analytics functions are total: empty or degenerate input produces a
//! neutral result rather than an error. Errors only come from configuration,
//! input loading and `ForecastService`.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use price_forecast::{generate_forecast, PriceObservation, TrendDirection};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let history: Vec<PriceObservation> = (0..10)
//!     .map(|i| PriceObservation::new(start + Duration::days(i), 100.0 + 10.0 * i as f64))
//!     .collect();
//!
//! let forecast = generate_forecast(&history, 5);
//! assert_eq!(forecast.len(), 5);
//! assert_eq!(forecast.trend, TrendDirection::Up);
//! ```

pub mod alerts;
pub mod anomaly;
pub mod categories;
pub mod config;
pub mod data;
pub mod error;
pub mod forecaster;
pub mod intensity;
pub mod periods;
pub mod report;
pub mod seasonality;
pub mod service;
pub mod strategy;
pub mod trend;
pub mod weekly;

// Re-export commonly used types
pub use crate::alerts::{AlertKind, AlertRule, AlertThreshold};
pub use crate::anomaly::{
    detect_anomaly, detect_anomaly_default, AnomalyDirection, AnomalyResult, Severity,
};
pub use crate::categories::{
    analyze_categories, CategoryAnalysis, CategoryReport, CategorySummary, Opportunity, Threat,
};
pub use crate::config::{AnalyticsConfig, AnomalyConfig, ForecastConfig, ReportConfig};
pub use crate::data::{Category, MarketPrice, PriceObservation, PriceRecord};
pub use crate::error::ForecastError;
pub use crate::forecaster::{generate_forecast, BlendedForecaster, ForecastResult, PricePrediction};
pub use crate::intensity::competitive_intensity;
pub use crate::periods::{
    aggregate_by_period, build_trend_series, format_trend_data, ChartPoint, Period, TrendPoint,
};
pub use crate::report::{scan_anomalies, AnomalyReport, AnomalyScanner, PriceGroup};
pub use crate::seasonality::{detect_seasonality, monthly_averages, MonthlyPrice, SeasonalityResult};
pub use crate::service::{ForecastReport, ForecastRequest, ForecastService, RiskLevel};
pub use crate::strategy::{classify_pricing_strategy, MarketPosition, PricingStrategy};
pub use crate::trend::{analyze_trend, TrendDirection, TrendResult};
pub use crate::weekly::{weekly_report, CategoryTrend, PriceMove, WeeklyReport, WeeklyStats};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
