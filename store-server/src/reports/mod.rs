//! Margin Aggregator
//!
//! Read-only rollups of revenue/cost/margin computed from frozen
//! per-item costs. Revenue excludes shipping; a `unit_cost` of 0 means
//! "unknown" and simply contributes zero cost: reports are computed on
//! best-available data and never fail on incomplete freezing.
//!
//! The default filter excludes cancelled orders; an explicit status
//! filter (including `cancelled`) restricts to exactly that status.
//! This is a deliberate reporting default, not an oversight.

use rust_decimal::Decimal;
use shared::models::{OrderProfitRow, OrderStatus, ProductProfitRow, ProfitSummary};
use sqlx::SqlitePool;

use crate::db::repository::report::{ProfitItemRow, profit_rows};
use crate::orders::money::{line_total, to_f64};
use crate::utils::AppResult;
use crate::utils::time::millis_to_rfc3339;

/// Report filter; the time window is `[from, to)` in Unix millis.
#[derive(Debug, Clone, Default)]
pub struct ProfitFilter {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub customer_id: Option<i64>,
    /// `None` excludes cancelled orders; `Some(s)` restricts to `s`.
    pub status: Option<OrderStatus>,
}

async fn fetch_rows(pool: &SqlitePool, filter: &ProfitFilter) -> AppResult<Vec<ProfitItemRow>> {
    let (status, exclude_status) = match filter.status {
        Some(s) => (Some(s), None),
        None => (None, Some(OrderStatus::Cancelled)),
    };
    Ok(profit_rows(
        pool,
        filter.from,
        filter.to,
        filter.customer_id,
        status,
        exclude_status,
    )
    .await?)
}

// =============================================================================
// Public API
// =============================================================================

pub async fn summary(pool: &SqlitePool, filter: &ProfitFilter) -> AppResult<ProfitSummary> {
    Ok(aggregate_summary(&fetch_rows(pool, filter).await?))
}

/// Per-product rollup, sorted descending by revenue
pub async fn by_product(
    pool: &SqlitePool,
    filter: &ProfitFilter,
) -> AppResult<Vec<ProductProfitRow>> {
    Ok(aggregate_by_product(&fetch_rows(pool, filter).await?))
}

/// Per-order rollup, sorted descending by date
pub async fn by_order(pool: &SqlitePool, filter: &ProfitFilter) -> AppResult<Vec<OrderProfitRow>> {
    Ok(aggregate_by_order(&fetch_rows(pool, filter).await?))
}

/// Flat-file export of the per-product rollup: UTF-8 with BOM, comma
/// separated, monetary values to two decimal places.
pub async fn consumption_csv(pool: &SqlitePool, filter: &ProfitFilter) -> AppResult<String> {
    Ok(to_csv(&by_product(pool, filter).await?))
}

// =============================================================================
// Pure aggregation (unit-testable without storage)
// =============================================================================

fn revenue_of(row: &ProfitItemRow) -> Decimal {
    line_total(row.price, row.qty)
}

fn cost_of(row: &ProfitItemRow) -> Decimal {
    line_total(row.unit_cost, row.qty)
}

fn aggregate_summary(rows: &[ProfitItemRow]) -> ProfitSummary {
    let mut orders = std::collections::HashSet::new();
    let mut revenue = Decimal::ZERO;
    let mut cost = Decimal::ZERO;
    for row in rows {
        orders.insert(row.order_id);
        revenue += revenue_of(row);
        cost += cost_of(row);
    }
    ProfitSummary {
        orders_count: orders.len() as i64,
        revenue: to_f64(revenue),
        cost: to_f64(cost),
        margin: to_f64(revenue - cost),
    }
}

struct ProductAcc {
    product_id: i64,
    product_name: String,
    qty: i64,
    revenue: Decimal,
    cost: Decimal,
}

fn aggregate_by_product(rows: &[ProfitItemRow]) -> Vec<ProductProfitRow> {
    let mut accs: Vec<ProductAcc> = Vec::new();
    for row in rows {
        let acc = match accs.iter_mut().find(|a| a.product_id == row.product_id) {
            Some(acc) => acc,
            None => {
                accs.push(ProductAcc {
                    product_id: row.product_id,
                    product_name: row.product_name.clone(),
                    qty: 0,
                    revenue: Decimal::ZERO,
                    cost: Decimal::ZERO,
                });
                accs.last_mut().unwrap()
            }
        };
        acc.qty += row.qty;
        acc.revenue += revenue_of(row);
        acc.cost += cost_of(row);
    }

    // Revenue descending; product id as deterministic tie-break
    accs.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.product_id.cmp(&b.product_id)));
    accs.into_iter()
        .map(|a| ProductProfitRow {
            product_id: a.product_id,
            product_name: a.product_name,
            qty: a.qty,
            revenue: to_f64(a.revenue),
            cost: to_f64(a.cost),
            margin: to_f64(a.revenue - a.cost),
        })
        .collect()
}

fn aggregate_by_order(rows: &[ProfitItemRow]) -> Vec<OrderProfitRow> {
    // Rows arrive sorted by order date descending with each order's
    // items consecutive, so grouping by runs preserves the sort.
    let mut out: Vec<OrderProfitRow> = Vec::new();
    let mut current: Option<(i64, Decimal, Decimal)> = None;
    let mut iter = rows.iter().peekable();
    while let Some(row) = iter.next() {
        let entry = current.get_or_insert((row.order_id, Decimal::ZERO, Decimal::ZERO));
        entry.1 += revenue_of(row);
        entry.2 += cost_of(row);

        let next_is_same = iter
            .peek()
            .map(|next| next.order_id == row.order_id)
            .unwrap_or(false);
        if !next_is_same {
            let (order_id, revenue, cost) = current.take().unwrap();
            out.push(OrderProfitRow {
                order_id,
                date: millis_to_rfc3339(row.order_created_at),
                customer_email: row.customer_email.clone(),
                revenue: to_f64(revenue),
                cost: to_f64(cost),
                margin: to_f64(revenue - cost),
            });
        }
    }
    out
}

/// Escape a CSV field: quote when it contains a separator, quote or
/// newline, doubling embedded quotes.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn to_csv(rows: &[ProductProfitRow]) -> String {
    let mut out = String::from("\u{FEFF}productId,productName,qty,revenue,cost,margin\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{:.2},{:.2},{:.2}\n",
            row.product_id,
            csv_escape(&row.product_name),
            row.qty,
            row.revenue,
            row.cost,
            row.margin
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        order_id: i64,
        created_at: i64,
        product_id: i64,
        name: &str,
        price: f64,
        qty: i64,
        unit_cost: f64,
    ) -> ProfitItemRow {
        ProfitItemRow {
            order_id,
            order_created_at: created_at,
            customer_email: format!("c{order_id}@example.com"),
            product_id,
            product_name: name.to_string(),
            price,
            qty,
            unit_cost,
        }
    }

    fn sample_rows() -> Vec<ProfitItemRow> {
        vec![
            // newest order first, items consecutive per order
            row(2, 2_000, 10, "Mug", 10.0, 2, 4.0),
            row(2, 2_000, 11, "Tee", 25.0, 1, 0.0), // unknown cost
            row(1, 1_000, 10, "Mug", 10.0, 1, 4.0),
        ]
    }

    #[test]
    fn summary_counts_orders_and_balances() {
        let s = aggregate_summary(&sample_rows());
        assert_eq!(s.orders_count, 2);
        assert_eq!(s.revenue, 55.0);
        assert_eq!(s.cost, 12.0);
        assert_eq!(s.margin, s.revenue - s.cost);
    }

    #[test]
    fn by_product_sorts_by_revenue_desc_and_matches_summary() {
        let rows = sample_rows();
        let products = aggregate_by_product(&rows);
        let summary = aggregate_summary(&rows);

        assert_eq!(products.len(), 2);
        assert!(products[0].revenue >= products[1].revenue);
        assert_eq!(products[0].product_name, "Mug");
        assert_eq!(products[0].qty, 3);

        let product_revenue: f64 = products.iter().map(|p| p.revenue).sum();
        assert_eq!(summary.revenue, product_revenue);
        for p in &products {
            assert_eq!(p.margin, p.revenue - p.cost);
        }
    }

    #[test]
    fn by_order_groups_runs_and_keeps_date_order() {
        let orders = aggregate_by_order(&sample_rows());
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, 2);
        assert_eq!(orders[0].revenue, 45.0);
        assert_eq!(orders[0].cost, 8.0); // unknown cost contributes 0
        assert_eq!(orders[1].order_id, 1);
        assert!(orders[0].date >= orders[1].date);
    }

    #[test]
    fn unknown_cost_is_tolerated_never_an_error() {
        let rows = vec![row(1, 1_000, 5, "Mystery", 9.99, 3, 0.0)];
        let s = aggregate_summary(&rows);
        assert_eq!(s.cost, 0.0);
        assert_eq!(s.margin, s.revenue);
    }

    #[test]
    fn csv_has_bom_header_and_two_decimals() {
        let csv = to_csv(&aggregate_by_product(&sample_rows()));
        assert!(csv.starts_with('\u{FEFF}'));
        let mut lines = csv.trim_start_matches('\u{FEFF}').lines();
        assert_eq!(
            lines.next(),
            Some("productId,productName,qty,revenue,cost,margin")
        );
        assert_eq!(lines.next(), Some("10,Mug,3,30.00,12.00,18.00"));
        assert_eq!(lines.next(), Some("11,Tee,1,25.00,0.00,25.00"));
    }

    #[test]
    fn csv_escapes_commas_in_names() {
        let rows = vec![row(1, 1, 7, "Cup, large \"XL\"", 5.0, 1, 1.0)];
        let csv = to_csv(&aggregate_by_product(&rows));
        assert!(csv.contains("\"Cup, large \"\"XL\"\"\""));
    }
}
