//! HTTP layer - axum router, handlers and error mapping.

/// Request and response types
pub mod dto;
/// API error type and JSON error body
pub mod error;
/// Route handlers
pub mod handlers;
/// Shared handler state
pub mod state;

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;
pub use state::AppState;

/// Creates the application router with all routes and middleware.
pub fn create_router(state: AppState, cors_origins: &str) -> Router {
    let product_routes = Router::new()
        .route("/search/:month", get(handlers::search_products))
        .route("/monthlysale/:month", get(handlers::monthly_sale))
        .route("/monthlypricerange/:month", get(handlers::monthly_price_range))
        .route(
            "/monthlycategories/:month",
            get(handlers::monthly_category_breakdown),
        )
        .route("/getallapidata/:month", get(handlers::all_monthly_reports))
        // Path used by existing dashboard clients
        .route("/getAll3APIData/:month", get(handlers::all_monthly_reports));

    Router::new()
        .nest("/products", product_routes)
        .route("/seeddata", get(handlers::seed_data))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors_origins))
        .with_state(state)
}

/// Build CORS layer from configuration.
///
/// If `origins` is "*", allows any origin.
/// Otherwise, parses comma-separated origins.
fn build_cors_layer(origins: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600));

    if origins.trim() == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(allowed)
    }
}
