//! Month resolution for reporting queries.
//!
//! Reporting months follow the IST calendar: each UTC sale timestamp is shifted
//! by +05:30, rendered as text, and its two-digit month segment is compared with
//! the zero-padded index of the requested month.

use crate::{
    entities::{Product, product},
    errors::Result,
};
use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::{QueryOrder, prelude::*};
use tracing::{debug, instrument};

/// Month names in calendar order. Lookup is exact, so names must be lowercase.
pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Path value meaning "no month filter".
pub const ALL_MONTHS: &str = "All";

/// IST offset from UTC, in minutes.
const IST_OFFSET_MINUTES: i64 = 5 * 60 + 30;

/// Which months a listing query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthSelector {
    /// Every record, regardless of sale date
    All,
    /// Records sold in the given month; 1-12, or 0 for an unrecognized name
    Month(u32),
}

impl MonthSelector {
    /// Parses a path segment. `"All"` is the sentinel, anything else goes
    /// through [`month_index`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_MONTHS {
            Self::All
        } else {
            Self::Month(month_index(raw))
        }
    }

    /// False for a month name that resolved to index 0.
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        match self {
            Self::All => true,
            Self::Month(index) => *index >= 1 && *index <= 12,
        }
    }

    /// Whether a sale timestamp falls in the selected IST month.
    #[must_use]
    pub fn matches(&self, date_of_sale: &DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Month(index) => ist_month_key(date_of_sale) == month_key(*index),
        }
    }
}

/// 1-based position of `name` in [`MONTH_NAMES`], or 0 when it is not there.
#[must_use]
pub fn month_index(name: &str) -> u32 {
    MONTH_NAMES
        .iter()
        .position(|candidate| *candidate == name)
        .and_then(|pos| u32::try_from(pos + 1).ok())
        .unwrap_or(0)
}

/// Two-digit month key used for matching (`3` -> `"03"`).
#[must_use]
pub fn month_key(index: u32) -> String {
    format!("{index:02}")
}

/// Month segment of the timestamp rendered in IST.
///
/// The timestamp is shifted by the fixed IST offset, formatted as
/// `YYYY-MM-DDTHH:MM:SS.mmmZ`, and characters 5..7 are taken.
#[must_use]
pub fn ist_month_key(date_of_sale: &DateTime<Utc>) -> String {
    let shifted = date_of_sale.naive_utc() + TimeDelta::minutes(IST_OFFSET_MINUTES);
    let rendered = shifted.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    rendered.get(5..7).unwrap_or_default().to_string()
}

/// Loads every record whose IST sale month matches `index`, in id order.
///
/// This is a full scan; the month is derived per row rather than indexed.
#[instrument(skip(db))]
pub async fn products_in_month(
    db: &DatabaseConnection,
    index: u32,
) -> Result<Vec<product::Model>> {
    let selector = MonthSelector::Month(index);
    let all = Product::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;

    let scanned = all.len();
    let matching: Vec<product::Model> = all
        .into_iter()
        .filter(|p| selector.matches(&p.date_of_sale))
        .collect();

    debug!(scanned, matched = matching.len(), "Filtered products by month");
    Ok(matching)
}
