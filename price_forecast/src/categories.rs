//! Per-category competition analysis
//!
//! Groups priced rows by category and scores each category's market:
//! average and range, competitive intensity and split-half trend. The
//! intensity and trend are turned into opportunity and threat flags.

use crate::data::MarketPrice;
use crate::intensity::competitive_intensity;
use crate::trend::{analyze_trend, TrendDirection};
use chrono::{DateTime, Utc};
use price_math::{mean, round_to, StatisticsSummary};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Fewest priced rows a category needs to be analysed
pub const MIN_CATEGORY_PRICES: usize = 5;
/// Intensity above which a category counts as highly competitive
pub const HIGH_COMPETITION_INTENSITY: f64 = 7.0;
/// Intensity below which a category counts as weakly contested
pub const LOW_COMPETITION_INTENSITY: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opportunity {
    LowCompetition,
    RisingPrices,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threat {
    HighCompetition,
    FallingPrices,
}

/// Whole-unit price range
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAnalysis {
    pub id: i64,
    pub name: String,
    pub procedure_count: usize,
    pub competitor_count: usize,
    pub avg_price: f64,
    pub price_range: PriceRange,
    pub competitive_intensity: f64,
    pub trend: TrendDirection,
    pub trend_strength: f64,
    pub opportunities: Vec<Opportunity>,
    pub threats: Vec<Threat>,
}

impl CategoryAnalysis {
    pub fn is_high_competition(&self) -> bool {
        self.competitive_intensity > HIGH_COMPETITION_INTENSITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub total_categories: usize,
    /// Rounded to 1 decimal; 0 without categories
    pub avg_competitive_intensity: f64,
    pub rising_categories: usize,
    pub declining_categories: usize,
    pub high_competition_categories: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReport {
    pub summary: CategorySummary,
    /// Most competitive first
    pub categories: Vec<CategoryAnalysis>,
}

#[derive(Default)]
struct CategoryGroup {
    name: String,
    points: Vec<(DateTime<Utc>, f64)>,
    procedures: BTreeSet<i64>,
    competitors: BTreeSet<i64>,
}

/// Analyse every category with enough priced rows
///
/// Rows without a category or without a positive price are ignored.
pub fn analyze_categories(rows: &[MarketPrice]) -> CategoryReport {
    let mut groups: BTreeMap<i64, CategoryGroup> = BTreeMap::new();
    for row in rows {
        let Some(category) = &row.category else {
            continue;
        };
        let price = row.effective_price();
        if price <= 0.0 {
            continue;
        }

        let group = groups.entry(category.id).or_insert_with(|| CategoryGroup {
            name: category.name.clone(),
            ..CategoryGroup::default()
        });
        group.points.push((row.timestamp(), price));
        group.procedures.insert(row.procedure_id);
        group.competitors.insert(row.competitor_id);
    }

    let mut categories: Vec<CategoryAnalysis> = groups
        .into_iter()
        .filter_map(|(id, group)| {
            if group.points.len() < MIN_CATEGORY_PRICES {
                debug!(category = id, prices = group.points.len(), "Category skipped");
                return None;
            }
            Some(analyze_group(id, group))
        })
        .collect();

    categories.sort_by(|a, b| b.competitive_intensity.total_cmp(&a.competitive_intensity));

    let intensities: Vec<f64> = categories.iter().map(|c| c.competitive_intensity).collect();
    let count_trend = |direction| categories.iter().filter(|c| c.trend == direction).count();
    let summary = CategorySummary {
        total_categories: categories.len(),
        avg_competitive_intensity: round_to(mean(&intensities), 1),
        rising_categories: count_trend(TrendDirection::Up),
        declining_categories: count_trend(TrendDirection::Down),
        high_competition_categories: categories.iter().filter(|c| c.is_high_competition()).count(),
    };

    info!(
        categories = summary.total_categories,
        high_competition = summary.high_competition_categories,
        "Category analysis complete"
    );

    CategoryReport {
        summary,
        categories,
    }
}

fn analyze_group(id: i64, mut group: CategoryGroup) -> CategoryAnalysis {
    group.points.sort_by_key(|&(timestamp, _)| timestamp);
    let prices: Vec<f64> = group.points.iter().map(|&(_, price)| price).collect();

    let stats = StatisticsSummary::from_values(&prices);
    let intensity = competitive_intensity(&prices);
    let trend = analyze_trend(&prices);

    let mut opportunities = Vec::new();
    let mut threats = Vec::new();
    if intensity < LOW_COMPETITION_INTENSITY {
        opportunities.push(Opportunity::LowCompetition);
    }
    if intensity > HIGH_COMPETITION_INTENSITY {
        threats.push(Threat::HighCompetition);
    }
    match trend.direction {
        TrendDirection::Up => opportunities.push(Opportunity::RisingPrices),
        TrendDirection::Down => threats.push(Threat::FallingPrices),
        TrendDirection::Stable => {}
    }

    CategoryAnalysis {
        id,
        name: group.name,
        procedure_count: group.procedures.len(),
        competitor_count: group.competitors.len(),
        avg_price: round_to(stats.mean, 0),
        price_range: PriceRange {
            min: round_to(stats.min, 0),
            max: round_to(stats.max, 0),
        },
        competitive_intensity: intensity,
        trend: trend.direction,
        trend_strength: trend.strength,
        opportunities,
        threats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Category, PriceRecord};
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(category: Option<(i64, &str)>, competitor_id: i64, day: i64, price: f64) -> MarketPrice {
        MarketPrice {
            procedure_id: category.map_or(0, |(id, _)| id * 100 + day % 2),
            competitor_id,
            category: category.map(|(id, name)| Category {
                id,
                name: name.to_string(),
            }),
            record: PriceRecord {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::days(day),
                regular_price: Some(price),
                event_price: None,
            },
        }
    }

    fn series(category: (i64, &str), prices: &[f64]) -> Vec<MarketPrice> {
        prices
            .iter()
            .enumerate()
            .map(|(day, &price)| row(Some(category), day as i64 % 3, day as i64, price))
            .collect()
    }

    fn market() -> Vec<MarketPrice> {
        let mut rows = Vec::new();
        // Listed newest first to check chronological ordering
        let mut botox = series((1, "Botox"), &[100.0, 102.0, 98.0, 110.0, 112.0, 108.0]);
        botox.reverse();
        rows.extend(botox);
        rows.extend(series((2, "Laser"), &[50.0, 150.0, 100.0, 40.0, 60.0]));
        rows.extend(series((3, "Filler"), &[200.0; 5]));
        rows.extend(series((4, "Peel"), &[80.0, 90.0, 85.0, 95.0]));
        // Unpriced and uncategorised rows are ignored
        rows.push(row(Some((4, "Peel")), 1, 9, 0.0));
        rows.push(row(None, 1, 9, 300.0));
        rows
    }

    #[test]
    fn test_categories_ranked_by_intensity() {
        let report = analyze_categories(&market());
        let ranked: Vec<(&str, f64)> = report
            .categories
            .iter()
            .map(|c| (c.name.as_str(), c.competitive_intensity))
            .collect();
        assert_eq!(ranked, vec![("Filler", 10.0), ("Botox", 9.0), ("Laser", 0.0)]);
    }

    #[test]
    fn test_category_metrics() {
        let report = analyze_categories(&market());

        let botox = &report.categories[1];
        assert_eq!(botox.id, 1);
        assert_eq!(botox.avg_price, 105.0);
        assert_eq!(botox.price_range, PriceRange { min: 98.0, max: 112.0 });
        assert_eq!(botox.trend, TrendDirection::Up);
        assert_eq!(botox.trend_strength, 0.5);
        assert_eq!(botox.procedure_count, 2);
        assert_eq!(botox.competitor_count, 3);
        assert_eq!(botox.opportunities, vec![Opportunity::RisingPrices]);
        assert_eq!(botox.threats, vec![Threat::HighCompetition]);

        let laser = &report.categories[2];
        assert_eq!(laser.avg_price, 80.0);
        assert_eq!(laser.trend, TrendDirection::Down);
        assert_eq!(laser.trend_strength, 1.0);
        assert_eq!(laser.opportunities, vec![Opportunity::LowCompetition]);
        assert_eq!(laser.threats, vec![Threat::FallingPrices]);

        let filler = &report.categories[0];
        assert_eq!(filler.trend, TrendDirection::Stable);
        assert!(filler.opportunities.is_empty());
        assert_eq!(filler.threats, vec![Threat::HighCompetition]);
    }

    #[test]
    fn test_summary() {
        let report = analyze_categories(&market());
        assert_eq!(
            report.summary,
            CategorySummary {
                total_categories: 3,
                avg_competitive_intensity: 6.3,
                rising_categories: 1,
                declining_categories: 1,
                high_competition_categories: 2,
            }
        );
    }

    #[test]
    fn test_sparse_categories_are_skipped() {
        let rows = series((4, "Peel"), &[80.0, 90.0, 85.0, 95.0]);
        assert_eq!(analyze_categories(&rows), CategoryReport::default());
    }

    #[test]
    fn test_json_labels() {
        let report = analyze_categories(&market());
        let value = serde_json::to_value(&report.categories[2]).unwrap();
        assert_eq!(value["priceRange"], json!({ "min": 40.0, "max": 150.0 }));
        assert_eq!(value["opportunities"], json!(["low_competition"]));
        assert_eq!(value["threats"], json!(["falling_prices"]));
        assert_eq!(value["trend"], json!("down"));
    }
}
