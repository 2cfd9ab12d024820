//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{
    Order, OrderCreate, OrderNoteUpdate, OrderStatusUpdate, PaginatedResponse,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order::{self as order_repo, OrderListFilter};
use crate::orders;
use crate::utils::time::parse_window_bound;
use crate::utils::validation::{MAX_NOTE_LEN, clamp_page, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// Query params for order listings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    pub status: Option<shared::models::OrderStatus>,
    /// Window start: millis, RFC 3339 or YYYY-MM-DD
    pub from: Option<String>,
    /// Window end (exclusive)
    pub to: Option<String>,
    /// Free-text search over customer email/name/phone and item names
    pub q: Option<String>,
    pub number: Option<i64>,
    pub id: Option<i64>,
    pub customer_id: Option<i64>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

impl ListQuery {
    fn into_filter(self) -> AppResult<(OrderListFilter, i64, i64)> {
        let from = self.from.as_deref().map(parse_window_bound).transpose()?;
        let to = self.to.as_deref().map(parse_window_bound).transpose()?;
        let (page, page_size) = clamp_page(self.page, self.page_size);
        Ok((
            OrderListFilter {
                customer_id: self.customer_id,
                status: self.status,
                from,
                to,
                q: self.q.filter(|q| !q.trim().is_empty()),
                number: self.number,
                id: self.id,
            },
            page,
            page_size,
        ))
    }
}

/// Create a new order for the calling customer
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = orders::service::create_order(
        &state.pool,
        state.catalog.as_ref(),
        &state.order_policy(),
        &user,
        payload,
    )
    .await?;
    Ok(Json(order))
}

/// List the calling customer's own orders
pub async fn list_me(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<Order>>> {
    let (mut filter, page, page_size) = query.into_filter()?;
    filter.customer_id = Some(user.id);

    let (items, total) = order_repo::list(&state.pool, &filter, page, page_size).await?;
    Ok(Json(PaginatedResponse::new(items, total, page, page_size)))
}

/// Get an order by id. Customers only see their own orders; a foreign
/// id reads as not found rather than forbidden.
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = order_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    if !user.is_admin() && order.customer_id != user.id {
        return Err(AppError::not_found(format!("Order {} not found", id)));
    }
    Ok(Json(order))
}

/// Admin: list any orders with full filtering
pub async fn admin_list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<Order>>> {
    let (filter, page, page_size) = query.into_filter()?;
    let (items, total) = order_repo::list(&state.pool, &filter, page, page_size).await?;
    Ok(Json(PaginatedResponse::new(items, total, page, page_size)))
}

/// Admin: apply a status transition
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let order = orders::status::transition_status(
        &state.pool,
        state.catalog.as_ref(),
        &state.dispatcher,
        id,
        payload.status,
    )
    .await?;
    tracing::info!(order_id = id, status = %order.status, "Order status updated");
    Ok(Json(order))
}

/// Admin: replace the order note
pub async fn update_note(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderNoteUpdate>,
) -> AppResult<Json<Order>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    order_repo::update_note(&state.pool, id, &payload.note, shared::util::now_millis()).await?;
    let order = order_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

#[derive(Debug, serde::Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Admin: permanently remove an order and its items
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = order_repo::hard_delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Order {} not found", id)));
    }
    tracing::info!(order_id = id, "Order deleted");
    Ok(Json(DeleteResponse { deleted: true }))
}
