//! Product entity - One product transaction from the seeded dataset.
//!
//! Each row carries the listing text, its category and price, whether it sold,
//! and the sale timestamp in UTC. Rows are written only by the seeder and are
//! read-only for every reporting query.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Identifier taken from the source payload
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Listing title
    pub title: String,
    /// Listing description
    pub description: String,
    /// Category label (e.g., "electronics", "men's clothing")
    pub category: String,
    /// Price, never negative
    pub price: f64,
    /// Whether the item sold
    pub sold: bool,
    /// When the sale happened, stored in UTC
    pub date_of_sale: DateTimeUtc,
    /// Image URL, not used by reporting
    pub image: String,
}

/// Products have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
