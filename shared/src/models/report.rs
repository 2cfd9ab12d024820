//! Profit Report Models
//!
//! Read-only margin rollups computed from frozen per-item costs.
//! Revenue excludes shipping; `unit_cost == 0` counts as unknown cost,
//! never as an error.

use serde::{Deserialize, Serialize};

/// Aggregate across all matching orders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitSummary {
    pub orders_count: i64,
    pub revenue: f64,
    pub cost: f64,
    pub margin: f64,
}

/// Per-product rollup (sorted by revenue, descending)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductProfitRow {
    pub product_id: i64,
    pub product_name: String,
    pub qty: i64,
    pub revenue: f64,
    pub cost: f64,
    pub margin: f64,
}

/// Per-order rollup (sorted by date, descending)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProfitRow {
    pub order_id: i64,
    /// Order creation instant, RFC 3339
    pub date: String,
    pub customer_email: String,
    pub revenue: f64,
    pub cost: f64,
    pub margin: f64,
}
