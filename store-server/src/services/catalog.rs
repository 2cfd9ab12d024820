//! Catalog Lookup
//!
//! The one collaborator order creation and cost freezing depend on.
//! Production reads the local catalog snapshot table; tests substitute
//! recording mocks.

use async_trait::async_trait;
use shared::models::Product;
use sqlx::SqlitePool;

use crate::db::repository::product;
use crate::utils::AppResult;

#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Batch product lookup. Unknown ids are absent from the result,
    /// never an error.
    async fn get_products(&self, ids: &[i64]) -> AppResult<Vec<Product>>;
}

/// Catalog backed by the local `product` table
pub struct DbCatalog {
    pool: SqlitePool,
}

impl DbCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogLookup for DbCatalog {
    async fn get_products(&self, ids: &[i64]) -> AppResult<Vec<Product>> {
        Ok(product::find_by_ids(&self.pool, ids).await?)
    }
}
