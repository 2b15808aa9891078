//! Combined monthly report.
//!
//! Runs the sales, price-range and category reports for one month and packs
//! them into a single response, each section shaped exactly like its
//! standalone endpoint.

use crate::{
    core::{
        month::month_index,
        statistics::{
            CategoryReport, PriceRangeReport, SalesStatistics, monthly_categories,
            monthly_price_ranges, monthly_sales_statistics,
        },
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::instrument;

/// The month the report was built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMonth {
    /// Month name as requested
    pub month: String,
}

/// One element of the combined report array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportSection {
    /// Always first
    Month(ReportMonth),
    /// Sales totals
    Sales(SalesStatistics),
    /// Price histogram
    PriceRanges(PriceRangeReport),
    /// Category breakdown
    Categories(CategoryReport),
}

/// All three monthly reports in one body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedReport {
    /// `[month, sales, price ranges, categories]`
    #[serde(rename = "All3APIData")]
    pub sections: Vec<ReportSection>,
}

/// Builds the combined report for a month name.
///
/// The three reports run concurrently against the same connection pool; the
/// first error aborts the whole report.
#[instrument(skip(db))]
pub async fn combined_monthly_report(
    db: &DatabaseConnection,
    month: &str,
) -> Result<CombinedReport> {
    let index = month_index(month);

    let (sales, price_ranges, categories) = tokio::try_join!(
        monthly_sales_statistics(db, index),
        monthly_price_ranges(db, index),
        monthly_categories(db, index),
    )?;

    Ok(CombinedReport {
        sections: vec![
            ReportSection::Month(ReportMonth {
                month: month.to_string(),
            }),
            ReportSection::Sales(sales),
            ReportSection::PriceRanges(price_ranges),
            ReportSection::Categories(categories),
        ],
    })
}
