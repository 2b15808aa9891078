//! Dataset seeding from the remote JSON dump.
//!
//! Seeding is a destructive full replace: every stored product is deleted, the
//! dump is downloaded, and its entries are bulk-inserted. There is no rollback;
//! if the download fails after the delete, the table stays empty. Two seeds
//! running at once can interleave their deletes and inserts.

use crate::{
    entities::{Product, product},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use reqwest::Client;
use sea_orm::{Set, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Rows per `INSERT` statement, well under the `SQLite` bind-parameter limit.
const INSERT_CHUNK_SIZE: usize = 100;

/// One entry of the remote dataset as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecord {
    /// Source identifier, becomes the primary key
    pub id: i64,
    /// Listing title
    pub title: String,
    /// Listing description
    #[serde(default)]
    pub description: String,
    /// Category label
    pub category: String,
    /// Price
    pub price: f64,
    /// Whether the item sold
    pub sold: bool,
    /// Sale time with any offset; normalized to UTC on parse
    #[serde(default)]
    pub date_of_sale: Option<DateTime<Utc>>,
    /// Image URL
    #[serde(default)]
    pub image: String,
}

impl SeedRecord {
    /// Validates the record and converts it into an insertable model.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRecord`] when the price is negative or not
    /// finite, or when the sale date is missing.
    pub fn into_active_model(self) -> Result<product::ActiveModel> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::InvalidRecord {
                id: self.id,
                reason: format!("price must be a non-negative number, got {}", self.price),
            });
        }
        let Some(date_of_sale) = self.date_of_sale else {
            return Err(Error::InvalidRecord {
                id: self.id,
                reason: "missing dateOfSale".to_string(),
            });
        };

        Ok(product::ActiveModel {
            id: Set(self.id),
            title: Set(self.title),
            description: Set(self.description),
            category: Set(self.category),
            price: Set(self.price),
            sold: Set(self.sold),
            date_of_sale: Set(date_of_sale),
            image: Set(self.image),
        })
    }
}

/// Outcome of a seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    /// Records written to the store
    pub inserted: u64,
    /// Payload entries dropped for failing validation or repeating an id
    pub skipped: u64,
}

/// Builds the HTTP client used for dataset downloads.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Into::into)
}

/// Downloads and decodes the dataset.
///
/// # Errors
/// Returns [`Error::Upstream`] on connection failure, a non-2xx status, or a
/// body that is not a JSON array of records.
#[instrument(skip(client))]
pub async fn fetch_seed_records(client: &Client, url: &str) -> Result<Vec<SeedRecord>> {
    let records: Vec<SeedRecord> = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    info!(count = records.len(), "Fetched seed records");
    Ok(records)
}

/// Deletes every stored product, returning how many rows were removed.
pub async fn clear_products(db: &DatabaseConnection) -> Result<u64> {
    let result = Product::delete_many().exec(db).await?;
    info!(deleted = result.rows_affected, "Cleared products");
    Ok(result.rows_affected)
}

/// Validates and bulk-inserts records.
///
/// Invalid entries and repeated ids are skipped with a warning rather than
/// failing the whole batch.
#[instrument(skip(db, records), fields(count = records.len()))]
pub async fn insert_records(
    db: &DatabaseConnection,
    records: Vec<SeedRecord>,
) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();
    let mut seen_ids = HashSet::new();
    let mut models = Vec::with_capacity(records.len());

    for record in records {
        let id = record.id;
        if !seen_ids.insert(id) {
            warn!(id, "Skipping seed record with repeated id");
            summary.skipped += 1;
            continue;
        }
        match record.into_active_model() {
            Ok(model) => models.push(model),
            Err(e) => {
                warn!("Skipping seed record: {e}");
                summary.skipped += 1;
            }
        }
    }

    for chunk in models.chunks(INSERT_CHUNK_SIZE) {
        Product::insert_many(chunk.to_vec()).exec(db).await?;
        summary.inserted += chunk.len() as u64;
    }

    info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Inserted seed records"
    );
    Ok(summary)
}

/// Replaces the whole collection with `records`.
pub async fn replace_all(db: &DatabaseConnection, records: Vec<SeedRecord>) -> Result<SeedSummary> {
    clear_products(db).await?;
    insert_records(db, records).await
}

/// Clears the collection, then downloads and inserts the dataset from `url`.
///
/// The delete happens before the download, so a failed download leaves the
/// collection empty.
#[instrument(skip(db, client))]
pub async fn seed_from_source(
    db: &DatabaseConnection,
    client: &Client,
    url: &str,
) -> Result<SeedSummary> {
    clear_products(db).await?;
    let records = fetch_seed_records(client, url).await?;
    insert_records(db, records).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use axum::{Json, Router, routing::get};
    use sea_orm::PaginatorTrait;
    use serde_json::{Value, json};

    fn payload() -> Value {
        json!([
            {
                "id": 1,
                "title": "Fjallraven Backpack",
                "price": 329.85,
                "description": "Your perfect pack for everyday use",
                "category": "men's clothing",
                "image": "https://img.example/1.jpg",
                "sold": false,
                "dateOfSale": "2021-11-27T20:29:54+05:30"
            },
            {
                "id": 2,
                "title": "Slim Fit T-Shirt",
                "price": 44.6,
                "description": "Slim-fitting style",
                "category": "men's clothing",
                "image": "https://img.example/2.jpg",
                "sold": true,
                "dateOfSale": "2021-10-27T20:29:54+05:30"
            }
        ])
    }

    /// Serves `body` at `/data.json` on an ephemeral local port.
    async fn serve_json(body: Value) -> String {
        let app = Router::new().route(
            "/data.json",
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}/data.json")
    }

    /// A local URL with nothing listening behind it.
    async fn unreachable_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/data.json")
    }

    #[test]
    fn test_seed_record_normalizes_offset_to_utc() {
        let records: Vec<SeedRecord> = serde_json::from_value(payload()).unwrap();
        let date = records[0].date_of_sale.unwrap();
        assert_eq!(date.to_rfc3339(), "2021-11-27T14:59:54+00:00");
    }

    #[test]
    fn test_into_active_model_rejects_negative_price() {
        let record = SeedRecord {
            id: 7,
            title: "x".to_string(),
            description: String::new(),
            category: "c".to_string(),
            price: -1.0,
            sold: false,
            date_of_sale: Some(sale_date(1, 1)),
            image: String::new(),
        };
        assert!(matches!(
            record.into_active_model(),
            Err(Error::InvalidRecord { id: 7, .. })
        ));
    }

    #[tokio::test]
    async fn test_insert_records_skips_invalid_and_duplicates() -> Result<()> {
        let db = setup_test_db().await?;
        let records: Vec<SeedRecord> = serde_json::from_value(json!([
            { "id": 1, "title": "ok", "price": 10, "category": "c", "sold": true,
              "dateOfSale": "2022-01-05T10:00:00Z" },
            { "id": 1, "title": "dup", "price": 10, "category": "c", "sold": true,
              "dateOfSale": "2022-01-05T10:00:00Z" },
            { "id": 2, "title": "no date", "price": 10, "category": "c", "sold": false },
            { "id": 3, "title": "negative", "price": -5, "category": "c", "sold": false,
              "dateOfSale": "2022-01-05T10:00:00Z" }
        ]))
        .unwrap();

        let summary = insert_records(&db, records).await?;
        assert_eq!(summary, SeedSummary { inserted: 1, skipped: 3 });
        assert_eq!(Product::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_all_discards_previous_rows() -> Result<()> {
        let db = setup_test_db().await?;
        insert_month_batch(&db, 100, 5, 4).await?;

        let records: Vec<SeedRecord> = serde_json::from_value(payload()).unwrap();
        let summary = replace_all(&db, records).await?;

        assert_eq!(summary.inserted, 2);
        let stored = Product::find().all(&db).await?;
        let ids: Vec<i64> = stored.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(stored[0].price, 329.85);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_from_local_source() -> Result<()> {
        let db = setup_test_db().await?;
        let url = serve_json(payload()).await;
        let client = build_http_client(Duration::from_secs(5))?;

        let summary = seed_from_source(&db, &client, &url).await?;
        assert_eq!(summary, SeedSummary { inserted: 2, skipped: 0 });

        // 2021-11-27 20:29 IST is a November sale
        let november = crate::core::month::products_in_month(&db, 11).await?;
        assert_eq!(november.len(), 1);
        assert_eq!(november[0].title, "Fjallraven Backpack");
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_source_leaves_collection_empty() -> Result<()> {
        let db = setup_test_db().await?;
        insert_month_batch(&db, 1, 3, 2).await?;
        let client = build_http_client(Duration::from_secs(5))?;

        let result = seed_from_source(&db, &client, &unreachable_url().await).await;

        assert!(matches!(result, Err(Error::Upstream(_))));
        assert_eq!(Product::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_payload_is_upstream_error() -> Result<()> {
        let db = setup_test_db().await?;
        let url = serve_json(json!({ "not": "an array" })).await;
        let client = build_http_client(Duration::from_secs(5))?;

        let result = seed_from_source(&db, &client, &url).await;
        assert!(matches!(result, Err(Error::Upstream(_))));
        Ok(())
    }
}
