//! Product Model
//!
//! Catalog rows consumed by order creation and cost freezing. Catalog
//! management itself lives outside this service; the table is seeded
//! by the sync pipeline.

use serde::{Deserialize, Serialize};

/// Product entity (catalog snapshot source)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Current sell price (unit)
    pub price: f64,
    /// Current acquisition cost (unit), 0 when unknown
    pub cost: f64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
