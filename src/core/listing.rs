//! Product listing with search and pagination.
//!
//! A listing query combines an optional month filter, an optional free-text
//! search term and a 1-based page number. Searching is an in-memory scan over
//! either the month-filtered subset or the whole collection; only the plain
//! "all months, no search" case is answered with a store-side count and
//! `OFFSET/LIMIT`.

use crate::{
    core::month::{MonthSelector, products_in_month},
    entities::{Product, product},
    errors::Result,
};
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect, prelude::*};
use serde::Serialize;
use tracing::{debug, instrument};

/// Fixed number of records per page.
pub const PAGE_SIZE: u64 = 10;

/// Upper bound on `page`; the offset of every page up to it fits in an `i64`.
pub const MAX_PAGE: u64 = i64::MAX.unsigned_abs() / PAGE_SIZE;

/// One page of listing results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// Records on this page, at most [`PAGE_SIZE`]
    pub data: Vec<product::Model>,
    /// The page that was requested
    pub current_page: u64,
    /// `ceil(total / PAGE_SIZE)`
    pub number_of_pages: u64,
}

/// Case-insensitive matcher for the `searchQuery` parameter.
///
/// Title and description are matched by substring. When the query is a finite
/// number, the price is matched too, by substring on its decimal text, so `"10"`
/// matches prices 10, 100 and 210. The three checks are OR-ed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatcher {
    needle: String,
    price_needle: Option<String>,
}

impl SearchMatcher {
    /// Returns `None` for an empty query, which means "no search".
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }

        let price_needle = query
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(price_text);

        Some(Self {
            needle: query.to_lowercase(),
            price_needle,
        })
    }

    /// Whether the record matches on title, description or price text.
    #[must_use]
    pub fn matches(&self, record: &product::Model) -> bool {
        record.title.to_lowercase().contains(&self.needle)
            || record.description.to_lowercase().contains(&self.needle)
            || self
                .price_needle
                .as_ref()
                .is_some_and(|needle| price_text(record.price).contains(needle.as_str()))
    }
}

/// Shortest decimal rendering of a price (`100.0` -> `"100"`, `329.85` -> `"329.85"`).
#[must_use]
pub fn price_text(price: f64) -> String {
    // -0 renders as "0"
    if price == 0.0 {
        return "0".to_string();
    }
    price.to_string()
}

/// Number of pages needed for `total` records.
#[must_use]
pub const fn page_count(total: u64) -> u64 {
    total.div_ceil(PAGE_SIZE)
}

/// Records to skip before `page`. Page 0 is treated like page 1.
#[must_use]
pub const fn page_offset(page: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(PAGE_SIZE)
}

fn slice_page(records: Vec<product::Model>, page: u64) -> Vec<product::Model> {
    let skip = usize::try_from(page_offset(page)).unwrap_or(usize::MAX);
    records
        .into_iter()
        .skip(skip)
        .take(PAGE_SIZE as usize)
        .collect()
}

/// Lists one page of products for a month selector and optional search term.
///
/// # Arguments
/// * `db` - Database connection
/// * `month` - Month filter, or [`MonthSelector::All`]
/// * `search_query` - Free-text or numeric term; empty is the same as `None`
/// * `page` - 1-based page number
///
/// With both a month and a search term, the search runs over the month-filtered
/// records, so totals and pages describe the intersection.
#[instrument(skip(db))]
pub async fn list_products(
    db: &DatabaseConnection,
    month: MonthSelector,
    search_query: Option<&str>,
    page: u64,
) -> Result<ProductPage> {
    let matcher = search_query.and_then(SearchMatcher::new);

    let (total, data) = match (month, matcher) {
        (MonthSelector::Month(index), matcher) => {
            let monthly = products_in_month(db, index).await?;
            let filtered: Vec<product::Model> = match matcher {
                Some(m) => monthly.into_iter().filter(|p| m.matches(p)).collect(),
                None => monthly,
            };
            (filtered.len() as u64, slice_page(filtered, page))
        }
        (MonthSelector::All, Some(m)) => {
            let everything = Product::find()
                .order_by_asc(product::Column::Id)
                .all(db)
                .await?;
            let filtered: Vec<product::Model> =
                everything.into_iter().filter(|p| m.matches(p)).collect();
            (filtered.len() as u64, slice_page(filtered, page))
        }
        (MonthSelector::All, None) => {
            let total = Product::find().count(db).await?;
            let data = if page > MAX_PAGE {
                Vec::new()
            } else {
                Product::find()
                    .order_by_asc(product::Column::Id)
                    .offset(page_offset(page))
                    .limit(PAGE_SIZE)
                    .all(db)
                    .await?
            };
            (total, data)
        }
    };

    debug!(total, returned = data.len(), "Listed products");

    Ok(ProductPage {
        data,
        current_page: page,
        number_of_pages: page_count(total),
    })
}
