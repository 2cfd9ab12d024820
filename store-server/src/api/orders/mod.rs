//! Order API Module
//!
//! Customer routes create and read their own orders; admin routes
//! drive the lifecycle (status, note, deletion) and browse the full
//! ledger.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    let customer_routes = Router::new().nest("/api/orders", routes());

    let admin_routes = Router::new()
        .nest("/api/orders/admin", admin_only_routes())
        .layer(middleware::from_fn(require_admin));

    customer_routes.merge(admin_routes)
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/me", get(handler::list_me))
        .route("/{id}", get(handler::get_by_id))
}

fn admin_only_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::admin_list))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/note", patch(handler::update_note))
        .route("/{id}", delete(handler::remove))
}
