//! Shared test utilities.
//!
//! This module provides helpers for setting up in-memory test databases and
//! building product records with sensible defaults.

use crate::{
    entities::{Product, product},
    errors::Result,
};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use tracing_subscriber::EnvFilter;

pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Noon UTC on the given day of 2022. Noon stays in the same day under the IST shift.
#[allow(clippy::unwrap_used)]
pub fn sale_date(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, month, day, 12, 0, 0).unwrap()
}

/// Builds a product with defaults for the fields reporting does not look at.
///
/// # Defaults
/// * `description`: `"Description of {title}"`
/// * `category`: `"electronics"`
/// * `image`: a placeholder URL
pub fn sample_product(
    id: i64,
    title: &str,
    price: f64,
    sold: bool,
    date_of_sale: DateTime<Utc>,
) -> product::Model {
    product::Model {
        id,
        title: title.to_string(),
        description: format!("Description of {title}"),
        category: "electronics".to_string(),
        price,
        sold,
        date_of_sale,
        image: format!("https://img.example/{id}.jpg"),
    }
}

/// Same as [`sample_product`] with a custom category.
pub fn categorized_product(
    id: i64,
    category: &str,
    price: f64,
    date_of_sale: DateTime<Utc>,
) -> product::Model {
    product::Model {
        category: category.to_string(),
        ..sample_product(id, &format!("Item {id}"), price, false, date_of_sale)
    }
}

/// Inserts the given records directly, bypassing the seeder.
pub async fn insert_products(db: &DatabaseConnection, products: Vec<product::Model>) -> Result<()> {
    if products.is_empty() {
        return Ok(());
    }
    let models: Vec<product::ActiveModel> = products
        .into_iter()
        .map(|p| product::ActiveModel {
            id: Set(p.id),
            title: Set(p.title),
            description: Set(p.description),
            category: Set(p.category),
            price: Set(p.price),
            sold: Set(p.sold),
            date_of_sale: Set(p.date_of_sale),
            image: Set(p.image),
        })
        .collect();
    Product::insert_many(models).exec(db).await?;
    Ok(())
}

/// Inserts `count` products sold in `month`, with ids starting at `first_id`.
pub async fn insert_month_batch(
    db: &DatabaseConnection,
    first_id: i64,
    count: i64,
    month: u32,
) -> Result<()> {
    let products = (0..count)
        .map(|offset| {
            let id = first_id + offset;
            #[allow(clippy::cast_precision_loss)]
            let price = (id * 10) as f64;
            sample_product(id, &format!("Batch item {id}"), price, id % 2 == 0, sale_date(month, 10))
        })
        .collect();
    insert_products(db, products).await
}
