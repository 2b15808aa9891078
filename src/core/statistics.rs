//! Monthly aggregate statistics.
//!
//! Each report filters the collection to one IST month and then groups the
//! matching records: by `sold` for sales totals, by price band for the
//! histogram, and by `category` for the breakdown.

use crate::{
    core::month::products_in_month,
    entities::product,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::instrument;

/// Key of the open-ended top band.
pub const OPEN_BAND_KEY: u32 = 901;

/// Width of every closed price band.
const BAND_WIDTH: f64 = 100.0;

/// Sales totals for one month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStatistics {
    /// Sum of prices of sold items
    pub total_sale_amount: f64,
    /// Number of sold items
    pub total_sold_items_count: u64,
    /// Number of unsold items
    pub total_unsold_items_count: u64,
}

/// One non-empty price band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeBucket {
    /// Human-readable label, e.g. `"101 - 200"`
    pub price_range: String,
    /// Band key: the upper bound, or 901 for the open band
    #[serde(rename = "_id")]
    pub id: u32,
    /// Records in this band
    pub total_no_of_items: u64,
}

/// Price histogram for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeReport {
    /// Non-empty bands in ascending key order
    pub monthly_price_ranges: Vec<PriceRangeBucket>,
}

/// Record count for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// Category label
    #[serde(rename = "_id")]
    pub id: String,
    /// Records in this category
    pub count: u64,
}

/// Category breakdown for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    /// Categories present in the month, by name
    pub categories: Vec<CategoryCount>,
}

/// Band key for a price.
///
/// Bands are `[0, 100]`, `(100, 200]`, ..., `(800, 900]` keyed by their upper
/// bound, and everything above 900 goes to [`OPEN_BAND_KEY`].
#[must_use]
pub fn price_band(price: f64) -> u32 {
    if price <= BAND_WIDTH {
        return 100;
    }
    if price > 900.0 {
        return OPEN_BAND_KEY;
    }
    // price is in (100, 900] here, so the ceiling is 2..=9
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let band = (price / BAND_WIDTH).ceil() as u32;
    band * 100
}

/// Label for a band key.
#[must_use]
pub fn price_range_label(key: u32) -> String {
    if key <= 100 {
        "0 - 100".to_string()
    } else if key >= OPEN_BAND_KEY {
        "901 - above".to_string()
    } else {
        format!("{} - {}", key - 99, key)
    }
}

/// Folds records into sold/unsold totals.
#[must_use]
pub fn summarize_sales(records: &[product::Model]) -> SalesStatistics {
    records
        .iter()
        .fold(SalesStatistics::default(), |mut stats, record| {
            if record.sold {
                stats.total_sale_amount += record.price;
                stats.total_sold_items_count += 1;
            } else {
                stats.total_unsold_items_count += 1;
            }
            stats
        })
}

/// Groups records into price bands, dropping empty ones.
#[must_use]
pub fn bucket_prices(records: &[product::Model]) -> PriceRangeReport {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(price_band(record.price)).or_default() += 1;
    }

    PriceRangeReport {
        monthly_price_ranges: counts
            .into_iter()
            .map(|(key, total)| PriceRangeBucket {
                price_range: price_range_label(key),
                id: key,
                total_no_of_items: total,
            })
            .collect(),
    }
}

/// Counts records per category.
#[must_use]
pub fn count_categories(records: &[product::Model]) -> CategoryReport {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.category.as_str()).or_default() += 1;
    }

    CategoryReport {
        categories: counts
            .into_iter()
            .map(|(category, count)| CategoryCount {
                id: category.to_string(),
                count,
            })
            .collect(),
    }
}

/// Sales totals for the month with the given index.
#[instrument(skip(db))]
pub async fn monthly_sales_statistics(
    db: &DatabaseConnection,
    month: u32,
) -> Result<SalesStatistics> {
    let records = products_in_month(db, month).await?;
    Ok(summarize_sales(&records))
}

/// Price histogram for the month with the given index.
#[instrument(skip(db))]
pub async fn monthly_price_ranges(
    db: &DatabaseConnection,
    month: u32,
) -> Result<PriceRangeReport> {
    let records = products_in_month(db, month).await?;
    Ok(bucket_prices(&records))
}

/// Category breakdown for the month with the given index.
#[instrument(skip(db))]
pub async fn monthly_categories(db: &DatabaseConnection, month: u32) -> Result<CategoryReport> {
    let records = products_in_month(db, month).await?;
    Ok(count_categories(&records))
}
