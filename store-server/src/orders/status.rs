//! Status State Machine
//!
//! Validates and applies status transitions, stamping milestone
//! timestamps. The write is guarded by an optimistic version check so
//! concurrent transitions on the same order serialize: the losing
//! writer re-reads and retries against the fresh state instead of
//! silently overwriting. Side effects dispatch strictly after the
//! committed write and never affect its outcome.

use std::sync::Arc;

use shared::models::{Order, OrderStatus};
use shared::util::now_millis;
use sqlx::SqlitePool;

use crate::db::repository::order as order_repo;
use crate::orders::dispatch::Dispatcher;
use crate::orders::freeze::freeze_costs;
use crate::services::CatalogLookup;
use crate::utils::{AppError, AppResult};

const MAX_ATTEMPTS: u32 = 3;

/// Milestone timestamp column for a target status; `pending` has none.
pub fn milestone_column(status: OrderStatus) -> Option<&'static str> {
    match status {
        OrderStatus::Pending => None,
        OrderStatus::Confirmed => Some("confirmed_at"),
        OrderStatus::Shipped => Some("shipped_at"),
        OrderStatus::Delivered => Some("delivered_at"),
        OrderStatus::Cancelled => Some("canceled_at"),
    }
}

/// Statuses whose entry re-freezes missing costs before the write
/// commits (financial-integrity guard against earlier incomplete
/// freezing).
fn refreezes_costs(to: OrderStatus) -> bool {
    matches!(
        to,
        OrderStatus::Confirmed | OrderStatus::Shipped | OrderStatus::Delivered
    )
}

/// Apply a status transition and return the updated order snapshot.
///
/// Illegal (from, to) pairs are rejected with `InvalidTransition` and
/// the stored status stays unchanged. Legal self-transitions
/// (delivered→delivered, cancelled→cancelled) restamp their milestone
/// on every replay.
pub async fn transition_status(
    pool: &SqlitePool,
    catalog: &dyn CatalogLookup,
    dispatcher: &Arc<Dispatcher>,
    order_id: i64,
    to: OrderStatus,
) -> AppResult<Order> {
    let mut attempt = 0;
    loop {
        attempt += 1;

        let mut order = order_repo::find_by_id(pool, order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

        let from = order.status;
        if !from.can_transition_to(to) {
            return Err(AppError::invalid_transition(from, to));
        }

        if refreezes_costs(to) {
            freeze_costs(pool, catalog, &mut order.items).await?;
        }

        let now = now_millis();
        let milestone = milestone_column(to);
        let committed =
            order_repo::update_status_checked(pool, order_id, to, milestone, now, order.version)
                .await?;

        if !committed {
            // Lost the optimistic race; retry against the fresh state
            if attempt < MAX_ATTEMPTS {
                tracing::debug!(order_id, attempt, "Concurrent status write, retrying");
                continue;
            }
            return Err(AppError::Transient(format!(
                "Order {order_id} status contention, gave up after {MAX_ATTEMPTS} attempts"
            )));
        }

        order.status = to;
        order.updated_at = now;
        order.version += 1;
        match to {
            OrderStatus::Confirmed => order.confirmed_at = Some(now),
            OrderStatus::Shipped => order.shipped_at = Some(now),
            OrderStatus::Delivered => order.delivered_at = Some(now),
            OrderStatus::Cancelled => order.canceled_at = Some(now),
            OrderStatus::Pending => {}
        }

        tracing::info!(
            order_id,
            number = order.number,
            from = %from,
            to = %to,
            "Order status transition committed"
        );

        // Fire-and-forget: the HTTP response never waits on mail/PDF/push
        dispatcher.spawn(order.clone(), from, to);
        return Ok(order);
    }
}
