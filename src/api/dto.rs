//! Request and response types for the HTTP surface.

use crate::core::listing::MAX_PAGE;
use crate::core::month::{MonthSelector, month_index};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Message returned after a successful reseed.
pub const SEED_SUCCESS_MESSAGE: &str =
    "Third Party API Data have been seeded to DB Successfully";

/// Query parameters for `/products/search/:month`.
///
/// `page` stays a string so a bad value gets the crate's own `invalid_page`
/// error instead of the extractor's rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text or numeric search term
    #[serde(rename = "searchQuery")]
    pub search_query: Option<String>,
    /// 1-based page number, defaults to 1
    pub page: Option<String>,
}

impl SearchParams {
    /// The validated page number.
    pub fn page(&self) -> Result<u64> {
        parse_page(self.page.as_deref())
    }
}

/// Body of a successful `/seeddata` call.
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    /// Fixed success message
    pub message: String,
    /// Records stored
    pub inserted: u64,
    /// Payload entries dropped
    pub skipped: u64,
}

/// Parses `page`; absent means 1, anything but an integer in
/// `1..=MAX_PAGE` is rejected.
pub fn parse_page(raw: Option<&str>) -> Result<u64> {
    let Some(raw) = raw else {
        return Ok(1);
    };
    match raw.trim().parse::<u64>() {
        Ok(page) if (1..=MAX_PAGE).contains(&page) => Ok(page),
        _ => Err(Error::InvalidPage {
            raw: raw.to_string(),
        }),
    }
}

/// Month selector for the listing endpoint, which also accepts `All`.
pub fn listing_month(raw: &str) -> Result<MonthSelector> {
    let selector = MonthSelector::parse(raw);
    if selector.is_recognized() {
        Ok(selector)
    } else {
        Err(Error::UnknownMonth {
            name: raw.to_string(),
        })
    }
}

/// Month index for the report endpoints, which need a concrete month.
pub fn report_month(raw: &str) -> Result<u32> {
    match month_index(raw) {
        0 => Err(Error::UnknownMonth {
            name: raw.to_string(),
        }),
        index => Ok(index),
    }
}
