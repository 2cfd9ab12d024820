//! Cost Freezer
//!
//! Fills missing per-item cost snapshots from the catalog, idempotently.
//! An item's `unit_cost` is frozen the first time it gets a positive
//! value; already-frozen items are never touched and never trigger a
//! catalog lookup. A product missing from the catalog resolves to cost
//! 0 instead of failing the order (catalog drift must not block orders).

use std::collections::HashMap;

use shared::models::OrderItem;
use sqlx::SqlitePool;

use crate::db::repository::order as order_repo;
use crate::orders::money::round_money;
use crate::services::CatalogLookup;
use crate::utils::AppResult;

/// Resolve and persist missing costs for the given (already stored)
/// line items, updating them in place. Returns the number of items
/// whose cost was written.
///
/// When every item already carries a positive `unit_cost` this performs
/// zero catalog lookups.
pub async fn freeze_costs(
    pool: &SqlitePool,
    catalog: &dyn CatalogLookup,
    items: &mut [OrderItem],
) -> AppResult<usize> {
    let missing_ids: Vec<i64> = items
        .iter()
        .filter(|i| i.unit_cost <= 0.0)
        .map(|i| i.product_id)
        .collect();
    if missing_ids.is_empty() {
        return Ok(0);
    }

    let products = catalog.get_products(&missing_ids).await?;
    let costs: HashMap<i64, f64> = products.into_iter().map(|p| (p.id, p.cost)).collect();

    let mut writes = Vec::new();
    for item in items.iter_mut().filter(|i| i.unit_cost <= 0.0) {
        // Missing product: freeze at 0 ("unknown"), retried on a later pass
        let cost = round_money(costs.get(&item.product_id).copied().unwrap_or(0.0).max(0.0));
        item.unit_cost = cost;
        if cost > 0.0 {
            writes.push((item.id, cost));
        }
    }

    let frozen = writes.len();
    if !writes.is_empty() {
        order_repo::freeze_item_costs(pool, &writes).await?;
        tracing::debug!(frozen, "Froze missing line item costs");
    }
    Ok(frozen)
}
