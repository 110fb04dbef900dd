//! Price observations and their numeric projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single time-stamped competitor price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// When the price was observed
    pub timestamp: DateTime<Utc>,
    /// Observed price
    pub price: f64,
}

impl PriceObservation {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// A collected price row with optional regular and event (promotional) prices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    /// When the price was collected
    pub timestamp: DateTime<Utc>,
    /// List price
    #[serde(default)]
    pub regular_price: Option<f64>,
    /// Promotional price, preferred when present
    #[serde(default)]
    pub event_price: Option<f64>,
}

impl PriceRecord {
    /// The price the analytics use: event price, else regular price, else 0
    pub fn effective_price(&self) -> f64 {
        [self.event_price, self.regular_price]
            .into_iter()
            .flatten()
            .find(|&price| price > 0.0)
            .unwrap_or(0.0)
    }

    /// The record as an observation, when it carries a positive price
    pub fn observation(&self) -> Option<PriceObservation> {
        let price = self.effective_price();
        (price > 0.0).then(|| PriceObservation::new(self.timestamp, price))
    }
}

/// Effective prices of `records`, keeping only positive values, in input order
pub fn effective_prices(records: &[PriceRecord]) -> Vec<f64> {
    records
        .iter()
        .map(PriceRecord::effective_price)
        .filter(|&price| price > 0.0)
        .collect()
}

/// Observations for the records that carry a positive price
pub fn observations(records: &[PriceRecord]) -> Vec<PriceObservation> {
    records.iter().filter_map(PriceRecord::observation).collect()
}

/// Bare price sequence of a set of observations, in input order
pub fn prices(observations: &[PriceObservation]) -> Vec<f64> {
    observations.iter().map(|obs| obs.price).collect()
}

/// Procedure category a price belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A collected price tagged with what was priced and by whom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPrice {
    pub procedure_id: i64,
    pub competitor_id: i64,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(flatten)]
    pub record: PriceRecord,
}

impl MarketPrice {
    pub fn effective_price(&self) -> f64 {
        self.record.effective_price()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.record.timestamp
    }
}
