//! Product Repository
//!
//! Read-only lookups against the catalog snapshot table. Catalog
//! management is an external concern; this service never writes
//! product rows outside of tests.

use super::RepoResult;
use shared::models::Product;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const PRODUCT_SELECT: &str =
    "SELECT id, name, price, cost, image_url, is_active, created_at, updated_at FROM product";

/// Batch lookup by id. Unknown ids are simply absent from the result.
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Product>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb = QueryBuilder::<Sqlite>::new(PRODUCT_SELECT);
    qb.push(" WHERE id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    qb.push(")");
    let rows = qb.build_query_as::<Product>().fetch_all(pool).await?;
    Ok(rows)
}
