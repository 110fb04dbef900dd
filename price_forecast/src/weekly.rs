//! Week-over-week market summary
//!
//! Compares each procedure/competitor pair's newest price this week with
//! its newest priced row last week, keeps the moves of at least 3%, and
//! summarises this week's prices per category with a split-half trend.

use crate::data::MarketPrice;
use crate::trend::{analyze_trend, change_rate, TrendDirection};
use chrono::{DateTime, Utc};
use price_math::{mean, round_to};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Smallest week-over-week move, in percent, that is reported
pub const MIN_WEEKLY_CHANGE_PERCENT: f64 = 3.0;
/// Number of moves listed in a report
pub const TOP_CHANGES: usize = 10;
/// Category label for prices without a category
pub const UNCATEGORIZED: &str = "uncategorized";

/// One procedure/competitor price move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceMove {
    pub procedure_id: i64,
    pub competitor_id: i64,
    /// Rounded to 1 decimal
    pub change_percent: f64,
    /// `Up` or `Down`
    pub direction: TrendDirection,
    pub new_price: f64,
    pub old_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrend {
    pub category: String,
    pub trend: TrendDirection,
    pub change_percent: f64,
    /// Whole-unit average of this week's prices
    pub avg_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    /// Distinct competitors with a row this week
    pub total_competitors: usize,
    /// Distinct procedures with a row this week
    pub total_procedures: usize,
    /// Moves of at least the minimum change, before truncation
    pub price_changes: usize,
    /// Mean absolute move, rounded to 1 decimal
    pub avg_change_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub stats: WeeklyStats,
    /// Largest moves first, at most `TOP_CHANGES`
    pub top_changes: Vec<PriceMove>,
    /// One entry per category, ordered by name
    pub category_trends: Vec<CategoryTrend>,
}

type PairKey = (i64, i64);

fn pair_key(price: &MarketPrice) -> PairKey {
    (price.procedure_id, price.competitor_id)
}

/// Newest row per pair, as (timestamp, effective price)
fn newest_rows<'a, I>(rows: I) -> BTreeMap<PairKey, (DateTime<Utc>, f64)>
where
    I: IntoIterator<Item = &'a MarketPrice>,
{
    let mut newest: BTreeMap<PairKey, (DateTime<Utc>, f64)> = BTreeMap::new();
    for row in rows {
        let candidate = (row.timestamp(), row.effective_price());
        newest
            .entry(pair_key(row))
            .and_modify(|current| {
                if candidate.0 > current.0 {
                    *current = candidate;
                }
            })
            .or_insert(candidate);
    }
    newest
}

/// Build the weekly summary from this week's and last week's rows
///
/// A pair whose newest row this week carries no price is not compared, even
/// if an older row this week has one. Last week's side uses the newest
/// priced row.
pub fn weekly_report(this_week: &[MarketPrice], last_week: &[MarketPrice]) -> WeeklyReport {
    let current = newest_rows(this_week);
    let previous = newest_rows(last_week.iter().filter(|row| row.effective_price() > 0.0));

    let mut moves: Vec<PriceMove> = current
        .iter()
        .filter_map(|(&(procedure_id, competitor_id), &(_, new_price))| {
            let &(_, old_price) = previous.get(&(procedure_id, competitor_id))?;
            if new_price <= 0.0 {
                return None;
            }
            let change = change_rate(new_price, old_price);
            if change.abs() < MIN_WEEKLY_CHANGE_PERCENT {
                return None;
            }
            Some(PriceMove {
                procedure_id,
                competitor_id,
                change_percent: round_to(change, 1),
                direction: if change > 0.0 {
                    TrendDirection::Up
                } else {
                    TrendDirection::Down
                },
                new_price,
                old_price,
            })
        })
        .collect();

    moves.sort_by(|a, b| b.change_percent.abs().total_cmp(&a.change_percent.abs()));

    let magnitudes: Vec<f64> = moves.iter().map(|m| m.change_percent.abs()).collect();
    let stats = WeeklyStats {
        total_competitors: this_week
            .iter()
            .map(|row| row.competitor_id)
            .collect::<BTreeSet<_>>()
            .len(),
        total_procedures: this_week
            .iter()
            .map(|row| row.procedure_id)
            .collect::<BTreeSet<_>>()
            .len(),
        price_changes: moves.len(),
        avg_change_percent: round_to(mean(&magnitudes), 1),
    };

    info!(
        price_changes = stats.price_changes,
        avg_change_percent = stats.avg_change_percent,
        "Weekly report built"
    );

    moves.truncate(TOP_CHANGES);

    WeeklyReport {
        stats,
        top_changes: moves,
        category_trends: category_trends(this_week),
    }
}

fn category_trends(rows: &[MarketPrice]) -> Vec<CategoryTrend> {
    let mut by_category: BTreeMap<&str, Vec<(DateTime<Utc>, f64)>> = BTreeMap::new();
    for row in rows {
        let price = row.effective_price();
        if price <= 0.0 {
            continue;
        }
        let name = row
            .category
            .as_ref()
            .map_or(UNCATEGORIZED, |category| category.name.as_str());
        by_category
            .entry(name)
            .or_default()
            .push((row.timestamp(), price));
    }

    by_category
        .into_iter()
        .map(|(name, mut points)| {
            points.sort_by_key(|&(timestamp, _)| timestamp);
            let prices: Vec<f64> = points.into_iter().map(|(_, price)| price).collect();
            let trend = analyze_trend(&prices);
            CategoryTrend {
                category: name.to_string(),
                trend: trend.direction,
                change_percent: trend.change_percent,
                avg_price: round_to(mean(&prices), 0),
            }
        })
        .collect()
}
