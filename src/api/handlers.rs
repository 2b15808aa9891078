//! HTTP request handlers.
//!
//! Handlers validate path and query values, call into [`crate::core`], and wrap
//! the result as JSON. Every failure becomes an [`ApiError`] body.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::info;

use crate::api::dto::{
    SEED_SUCCESS_MESSAGE, SearchParams, SeedResponse, listing_month, report_month,
};
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::core::{
    listing::{ProductPage, list_products},
    report::{CombinedReport, combined_monthly_report},
    seed::seed_from_source,
    statistics::{
        CategoryReport, PriceRangeReport, SalesStatistics, monthly_categories,
        monthly_price_ranges, monthly_sales_statistics,
    },
};

/// `GET /products/search/:month?searchQuery=&page=`
pub async fn search_products(
    State(state): State<AppState>,
    Path(month): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ProductPage>, ApiError> {
    let selector = listing_month(&month)?;
    let page = params.page()?;

    let result = list_products(
        &state.database,
        selector,
        params.search_query.as_deref(),
        page,
    )
    .await?;

    Ok(Json(result))
}

/// `GET /products/monthlysale/:month`
pub async fn monthly_sale(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<SalesStatistics>, ApiError> {
    let index = report_month(&month)?;
    Ok(Json(monthly_sales_statistics(&state.database, index).await?))
}

/// `GET /products/monthlypricerange/:month`
pub async fn monthly_price_range(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<PriceRangeReport>, ApiError> {
    let index = report_month(&month)?;
    Ok(Json(monthly_price_ranges(&state.database, index).await?))
}

/// `GET /products/monthlycategories/:month`
pub async fn monthly_category_breakdown(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<CategoryReport>, ApiError> {
    let index = report_month(&month)?;
    Ok(Json(monthly_categories(&state.database, index).await?))
}

/// `GET /products/getallapidata/:month`
pub async fn all_monthly_reports(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<CombinedReport>, ApiError> {
    report_month(&month)?;
    Ok(Json(combined_monthly_report(&state.database, &month).await?))
}

/// `GET /seeddata`
///
/// Destructive: clears the collection before downloading.
pub async fn seed_data(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SeedResponse>), ApiError> {
    let summary =
        seed_from_source(&state.database, &state.http_client, &state.seed_source_url).await?;

    info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Data imported"
    );

    Ok((
        StatusCode::CREATED,
        Json(SeedResponse {
            message: SEED_SUCCESS_MESSAGE.to_string(),
            inserted: summary.inserted,
            skipped: summary.skipped,
        }),
    ))
}
