//! Order Model
//!
//! The order ledger entity: customer and line-item data are snapshots
//! captured at purchase time and never re-read from the live catalog
//! or customer profile. `unit_cost` is frozen once to a positive value
//! and immutable afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Order Status
// =============================================================================

/// Order status state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Legal transition table.
    ///
    /// | from      | may go to                      |
    /// |-----------|--------------------------------|
    /// | pending   | confirmed, cancelled           |
    /// | confirmed | shipped, cancelled             |
    /// | shipped   | delivered, confirmed, cancelled|
    /// | delivered | delivered, shipped             |
    /// | cancelled | pending, confirmed, cancelled  |
    ///
    /// The self-transitions delivered→delivered and cancelled→cancelled
    /// are legal idempotent restamps: every replay updates the matching
    /// milestone timestamp.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, to),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Shipped)
                | (Confirmed, Cancelled)
                | (Shipped, Delivered)
                | (Shipped, Confirmed)
                | (Shipped, Cancelled)
                | (Delivered, Delivered)
                | (Delivered, Shipped)
                | (Cancelled, Pending)
                | (Cancelled, Confirmed)
                | (Cancelled, Cancelled)
        )
    }

    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

// =============================================================================
// Order + Line Items
// =============================================================================

/// Order line item (product snapshot at purchase time)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    /// Catalog reference, not owned; the product may change or vanish later
    pub product_id: i64,
    pub name: String,
    /// Unit sell price snapshot, >= 0
    pub price: f64,
    /// Quantity, >= 1
    pub qty: i64,
    pub image_url: Option<String>,
    /// Unit acquisition cost snapshot, >= 0; 0 means "unknown".
    /// Frozen once to a positive value and never overwritten.
    pub unit_cost: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Human-readable order number, globally unique, strictly increasing
    pub number: i64,
    pub customer_id: i64,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_name: String,
    pub currency: String,
    pub subtotal: f64,
    pub shipping_fee: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub note: Option<String>,
    /// Milestone timestamps: the instant a status was last (re)entered
    pub confirmed_at: Option<i64>,
    pub shipped_at: Option<i64>,
    pub delivered_at: Option<i64>,
    pub canceled_at: Option<i64>,
    /// Optimistic concurrency token, bumped on every status write
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub items: Vec<OrderItem>,
}

// =============================================================================
// API Request Types
// =============================================================================

/// Cart entry in a create-order request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    pub product_id: i64,
    pub qty: i64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<CartItemInput>,
    pub note: Option<String>,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Note edit payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderNoteUpdate {
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_through_str() {
        for s in OrderStatus::ALL {
            assert_eq!(s.as_str().parse::<OrderStatus>().unwrap(), s);
        }
    }

    #[test]
    fn delivered_is_not_cancellable() {
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
    }
}
