//! Period aggregation and chart series
//!
//! Observations are bucketed by UTC day, ISO week (keyed by its Monday) or
//! calendar month (keyed by its first day). Each bucket becomes a
//! `TrendPoint`, and `format_trend_data` turns trend points into the flat
//! rows the charts plot.

use crate::data::PriceObservation;
use crate::forecaster::ForecastResult;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use price_math::StatisticsSummary;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Aggregation granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

/// Bucket date of `timestamp` for `period`
pub fn period_key(timestamp: DateTime<Utc>, period: Period) -> NaiveDate {
    let date = timestamp.date_naive();
    match period {
        Period::Daily => date,
        Period::Weekly => date - Duration::days(date.weekday().num_days_from_monday() as i64),
        Period::Monthly => date - Duration::days(date.day0() as i64),
    }
}

/// Price range of one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPrice {
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub count: usize,
}

impl From<StatisticsSummary> for AggregatedPrice {
    fn from(stats: StatisticsSummary) -> Self {
        Self {
            avg_price: stats.mean,
            min_price: stats.min,
            max_price: stats.max,
            count: stats.count,
        }
    }
}

/// Aggregate observations per period, keyed by period start
pub fn aggregate_by_period(
    observations: &[PriceObservation],
    period: Period,
) -> BTreeMap<NaiveDate, AggregatedPrice> {
    let mut buckets: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for obs in observations {
        buckets
            .entry(period_key(obs.timestamp, period))
            .or_default()
            .push(obs.price);
    }

    buckets
        .into_iter()
        .map(|(key, prices)| (key, StatisticsSummary::from_values(&prices).into()))
        .collect()
}

/// Percent change between two optional prices
///
/// `None` when either price is missing or zero.
pub fn price_change(old_price: Option<f64>, new_price: Option<f64>) -> Option<f64> {
    match (old_price, new_price) {
        (Some(old), Some(new)) if old != 0.0 && new != 0.0 => Some((new - old) / old * 100.0),
        _ => None,
    }
}

/// A competitor's price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorPrice {
    pub competitor_id: i64,
    pub observation: PriceObservation,
}

/// One period of a procedure's price trend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub procedure_id: i64,
    pub period: Period,
    pub period_date: NaiveDate,
    pub avg_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Change of the average against the previous period, in percent
    pub price_change: Option<f64>,
    /// Distinct competitors priced in the period
    pub competitor_count: Option<usize>,
}

impl TrendPoint {
    /// Daily trend points for a forecast horizon
    ///
    /// The predicted price is the average and the confidence bounds are the
    /// range, so forecasts chart like observed history.
    pub fn from_forecast(procedure_id: i64, forecast: &ForecastResult) -> Vec<TrendPoint> {
        let mut previous_avg = None;
        forecast
            .predictions
            .iter()
            .map(|prediction| {
                let avg_price = Some(prediction.predicted_price);
                let point = TrendPoint {
                    procedure_id,
                    period: Period::Daily,
                    period_date: prediction.date,
                    avg_price,
                    min_price: Some(prediction.lower_bound),
                    max_price: Some(prediction.upper_bound),
                    price_change: price_change(previous_avg, avg_price),
                    competitor_count: None,
                };
                previous_avg = avg_price;
                point
            })
            .collect()
    }
}

/// Chronological trend points of one procedure across competitors
pub fn build_trend_series(
    procedure_id: i64,
    prices: &[CompetitorPrice],
    period: Period,
) -> Vec<TrendPoint> {
    let observations: Vec<PriceObservation> = prices.iter().map(|p| p.observation).collect();
    let aggregated = aggregate_by_period(&observations, period);

    let mut competitors: BTreeMap<NaiveDate, BTreeSet<i64>> = BTreeMap::new();
    for price in prices {
        competitors
            .entry(period_key(price.observation.timestamp, period))
            .or_default()
            .insert(price.competitor_id);
    }

    let mut previous_avg = None;
    aggregated
        .into_iter()
        .map(|(period_date, stats)| {
            let point = TrendPoint {
                procedure_id,
                period,
                period_date,
                avg_price: Some(stats.avg_price),
                min_price: Some(stats.min_price),
                max_price: Some(stats.max_price),
                price_change: price_change(previous_avg, Some(stats.avg_price)),
                competitor_count: Some(competitors.get(&period_date).map_or(0, BTreeSet::len)),
            };
            previous_avg = Some(stats.avg_price);
            point
        })
        .collect()
}

/// Flat chart row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub avg_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub price_change: Option<f64>,
    pub competitor_count: Option<usize>,
}

/// Chart rows for trend points; zero prices are shown as gaps
pub fn format_trend_data(points: &[TrendPoint]) -> Vec<ChartPoint> {
    let non_zero = |price: Option<f64>| price.filter(|&p| p != 0.0);
    points
        .iter()
        .map(|point| ChartPoint {
            date: point.period_date.format("%Y-%m-%d").to_string(),
            avg_price: non_zero(point.avg_price),
            min_price: non_zero(point.min_price),
            max_price: non_zero(point.max_price),
            price_change: point.price_change,
            competitor_count: point.competitor_count,
        })
        .collect()
}
