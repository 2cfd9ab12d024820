//! Report Repository
//!
//! Flat line-item rows joined with their order's reporting fields.
//! Pure reads; all margin math happens in `reports` on top of these.

use super::RepoResult;
use shared::models::OrderStatus;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// One line item with the order context needed for margin rollups
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfitItemRow {
    pub order_id: i64,
    pub order_created_at: i64,
    pub customer_email: String,
    pub product_id: i64,
    pub product_name: String,
    pub price: f64,
    pub qty: i64,
    pub unit_cost: f64,
}

/// Fetch line items of orders matching the window/customer/status
/// constraints. `status` and `exclude_status` are mutually exclusive;
/// the caller passes exactly one (or neither).
pub async fn profit_rows(
    pool: &SqlitePool,
    from: Option<i64>,
    to: Option<i64>,
    customer_id: Option<i64>,
    status: Option<OrderStatus>,
    exclude_status: Option<OrderStatus>,
) -> RepoResult<Vec<ProfitItemRow>> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT o.id AS order_id, o.created_at AS order_created_at, \
         o.customer_email AS customer_email, oi.product_id AS product_id, \
         oi.name AS product_name, oi.price AS price, oi.qty AS qty, \
         oi.unit_cost AS unit_cost \
         FROM order_item oi JOIN orders o ON o.id = oi.order_id WHERE 1=1",
    );
    if let Some(from) = from {
        qb.push(" AND o.created_at >= ").push_bind(from);
    }
    if let Some(to) = to {
        qb.push(" AND o.created_at < ").push_bind(to);
    }
    if let Some(customer_id) = customer_id {
        qb.push(" AND o.customer_id = ").push_bind(customer_id);
    }
    if let Some(status) = status {
        qb.push(" AND o.status = ").push_bind(status);
    }
    if let Some(excluded) = exclude_status {
        qb.push(" AND o.status != ").push_bind(excluded);
    }
    qb.push(" ORDER BY o.created_at DESC, o.id DESC, oi.id");

    let rows = qb.build_query_as::<ProfitItemRow>().fetch_all(pool).await?;
    Ok(rows)
}
