//! Order Creation
//!
//! Builds a new order from a cart-like item list plus live catalog
//! data. Customer contact data, product names, prices, images and costs
//! are snapshotted at this instant; later catalog or profile changes
//! never reach back into the stored order.

use rust_decimal::Decimal;
use shared::models::{Order, OrderCreate, OrderItem, OrderStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::db::repository::order as order_repo;
use crate::orders::money::{line_total, round_money, to_f64, validate_money};
use crate::orders::numbering::next_order_number;
use crate::services::CatalogLookup;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text, validate_quantity};
use crate::utils::{AppError, AppResult};

/// Pricing policy applied to every new order
#[derive(Debug, Clone)]
pub struct OrderPolicy {
    /// Flat shipping fee added on top of the item subtotal
    pub shipping_fee: f64,
    pub currency: String,
}

/// Create and persist a new order for the calling customer.
///
/// Fails with `Validation` when the caller has no phone/address on file
/// or the cart is empty, and with `NotFound` when any product id cannot
/// be resolved; in every failure case nothing is persisted.
pub async fn create_order(
    pool: &SqlitePool,
    catalog: &dyn CatalogLookup,
    policy: &OrderPolicy,
    customer: &CurrentUser,
    payload: OrderCreate,
) -> AppResult<Order> {
    let phone = customer
        .phone
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::validation("Missing profile data: phone"))?;
    let address = customer
        .address
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| AppError::validation("Missing profile data: address"))?;

    if payload.items.is_empty() {
        return Err(AppError::validation("Order must contain at least one item"));
    }
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    for entry in &payload.items {
        validate_quantity(entry.qty, "qty")?;
    }

    // Resolve every product up front; one unknown id aborts the whole
    // creation before anything is written.
    let mut product_ids: Vec<i64> = payload.items.iter().map(|e| e.product_id).collect();
    product_ids.sort_unstable();
    product_ids.dedup();
    let products = catalog.get_products(&product_ids).await?;

    let order_id = snowflake_id();
    let mut items = Vec::with_capacity(payload.items.len());
    let mut subtotal = Decimal::ZERO;
    for entry in &payload.items {
        let product = products
            .iter()
            .find(|p| p.id == entry.product_id)
            .ok_or_else(|| AppError::not_found(format!("Product {} not found", entry.product_id)))?;
        validate_money(product.price, "price")?;

        // Snapshots are snapped to whole cents; sub-cent catalog
        // precision never reaches the stored order.
        let price = round_money(product.price);
        let qty = entry.qty.max(1);
        subtotal += line_total(price, qty);
        items.push(OrderItem {
            id: snowflake_id(),
            order_id,
            product_id: product.id,
            name: product.name.clone(),
            price,
            qty,
            image_url: product.image_url.clone(),
            // Costs are captured eagerly at creation, not deferred
            unit_cost: round_money(product.cost.max(0.0)),
        });
    }

    let shipping_fee = round_money(policy.shipping_fee);
    let total = subtotal + crate::orders::money::to_decimal(shipping_fee);
    let number = next_order_number(pool).await?;
    let now = now_millis();

    let order = Order {
        id: order_id,
        number,
        customer_id: customer.id,
        customer_email: customer.email.clone(),
        customer_phone: phone.to_string(),
        customer_address: address.to_string(),
        customer_name: customer.name.clone(),
        currency: policy.currency.clone(),
        subtotal: to_f64(subtotal),
        shipping_fee,
        total: to_f64(total),
        status: OrderStatus::Pending,
        note: payload.note,
        confirmed_at: None,
        shipped_at: None,
        delivered_at: None,
        canceled_at: None,
        version: 0,
        created_at: now,
        updated_at: now,
        items,
    };

    order_repo::insert(pool, &order).await?;
    tracing::info!(order_id = order.id, number = order.number, "Order created");
    Ok(order)
}
