//! Order Repository
//!
//! Row access for the order ledger. Orders are written atomically with
//! their line items; status writes carry an optimistic version check so
//! a losing concurrent writer can detect the conflict and retry.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const ORDER_SELECT: &str = "SELECT id, number, customer_id, customer_email, customer_phone, \
     customer_address, customer_name, currency, subtotal, shipping_fee, total, status, note, \
     confirmed_at, shipped_at, delivered_at, canceled_at, version, created_at, updated_at \
     FROM orders";

const ITEM_SELECT: &str =
    "SELECT id, order_id, product_id, name, price, qty, image_url, unit_cost FROM order_item";

/// List filter; unset fields are not constrained.
#[derive(Debug, Clone, Default)]
pub struct OrderListFilter {
    pub customer_id: Option<i64>,
    pub status: Option<OrderStatus>,
    /// Creation window `[from, to)` in Unix millis
    pub from: Option<i64>,
    pub to: Option<i64>,
    /// Free text over customer email/name/phone and item name
    pub q: Option<String>,
    pub number: Option<i64>,
    pub id: Option<i64>,
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &OrderListFilter) {
    if let Some(customer_id) = filter.customer_id {
        qb.push(" AND o.customer_id = ").push_bind(customer_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND o.status = ").push_bind(status);
    }
    if let Some(from) = filter.from {
        qb.push(" AND o.created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        qb.push(" AND o.created_at < ").push_bind(to);
    }
    if let Some(number) = filter.number {
        qb.push(" AND o.number = ").push_bind(number);
    }
    if let Some(id) = filter.id {
        qb.push(" AND o.id = ").push_bind(id);
    }
    if let Some(q) = &filter.q {
        let pattern = format!("%{q}%");
        qb.push(" AND (o.customer_email LIKE ")
            .push_bind(pattern.clone())
            .push(" OR o.customer_name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR o.customer_phone LIKE ")
            .push_bind(pattern.clone())
            .push(" OR EXISTS (SELECT 1 FROM order_item oi WHERE oi.order_id = o.id AND oi.name LIKE ")
            .push_bind(pattern)
            .push("))");
    }
}

/// Insert an order together with its line items, atomically.
pub async fn insert(pool: &SqlitePool, order: &Order) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO orders (id, number, customer_id, customer_email, customer_phone, \
         customer_address, customer_name, currency, subtotal, shipping_fee, total, status, note, \
         version, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order.id)
    .bind(order.number)
    .bind(order.customer_id)
    .bind(&order.customer_email)
    .bind(&order.customer_phone)
    .bind(&order.customer_address)
    .bind(&order.customer_name)
    .bind(&order.currency)
    .bind(order.subtotal)
    .bind(order.shipping_fee)
    .bind(order.total)
    .bind(order.status)
    .bind(&order.note)
    .bind(order.version)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *tx)
    .await?;

    for item in &order.items {
        sqlx::query(
            "INSERT INTO order_item (id, order_id, product_id, name, price, qty, image_url, unit_cost) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(item.id)
        .bind(order.id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.qty)
        .bind(&item.image_url)
        .bind(item.unit_cost)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("{ITEM_SELECT} WHERE order_id = ? ORDER BY id");
    let items = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(pool)
        .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match order {
        Some(mut order) => {
            order.items = find_items(pool, order.id).await?;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

/// Paginated list with total count. Items are attached to each order.
pub async fn list(
    pool: &SqlitePool,
    filter: &OrderListFilter,
    page: i64,
    page_size: i64,
) -> RepoResult<(Vec<Order>, i64)> {
    let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM orders o WHERE 1=1");
    push_filters(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "{} WHERE 1=1",
        ORDER_SELECT.replacen("FROM orders", "FROM orders o", 1)
    ));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY o.created_at DESC, o.id DESC LIMIT ")
        .push_bind(page_size)
        .push(" OFFSET ")
        .push_bind((page - 1) * page_size);
    let mut orders = qb.build_query_as::<Order>().fetch_all(pool).await?;

    attach_items(pool, &mut orders).await?;
    Ok((orders, total))
}

/// Fetch line items for a page of orders in one query
async fn attach_items(pool: &SqlitePool, orders: &mut [Order]) -> RepoResult<()> {
    if orders.is_empty() {
        return Ok(());
    }
    let mut qb = QueryBuilder::<Sqlite>::new(ITEM_SELECT);
    qb.push(" WHERE order_id IN (");
    let mut separated = qb.separated(", ");
    for order in orders.iter() {
        separated.push_bind(order.id);
    }
    qb.push(") ORDER BY id");
    let items = qb.build_query_as::<OrderItem>().fetch_all(pool).await?;

    for order in orders.iter_mut() {
        order.items = items
            .iter()
            .filter(|i| i.order_id == order.id)
            .cloned()
            .collect();
    }
    Ok(())
}

/// Conditional status write: succeeds only when the stored version still
/// matches. Returns false on a lost optimistic race (caller re-reads and
/// retries). `milestone` is the timestamp column for the target status.
pub async fn update_status_checked(
    pool: &SqlitePool,
    id: i64,
    to: OrderStatus,
    milestone: Option<&'static str>,
    now: i64,
    expected_version: i64,
) -> RepoResult<bool> {
    // milestone comes from a fixed whitelist in orders::status, never user input
    let sql = match milestone {
        Some(col) => format!(
            "UPDATE orders SET status = ?1, {col} = ?2, updated_at = ?2, \
             version = version + 1 WHERE id = ?3 AND version = ?4"
        ),
        None => "UPDATE orders SET status = ?1, updated_at = ?2, \
                 version = version + 1 WHERE id = ?3 AND version = ?4"
            .to_string(),
    };
    let rows = sqlx::query(&sql)
        .bind(to)
        .bind(now)
        .bind(id)
        .bind(expected_version)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn update_note(
    pool: &SqlitePool,
    id: i64,
    note: &Option<String>,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET note = ?, updated_at = ? WHERE id = ?")
        .bind(note)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}

/// Write resolved costs. The `unit_cost <= 0` guard makes the write
/// idempotent: a positive cost is frozen and can never be overwritten.
pub async fn freeze_item_costs(pool: &SqlitePool, costs: &[(i64, f64)]) -> RepoResult<()> {
    for (item_id, cost) in costs {
        sqlx::query("UPDATE order_item SET unit_cost = ? WHERE id = ? AND unit_cost <= 0")
            .bind(cost)
            .bind(item_id)
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// Administrative hard delete; bypasses the state machine entirely.
/// Line items go with the order (ON DELETE CASCADE).
pub async fn hard_delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
