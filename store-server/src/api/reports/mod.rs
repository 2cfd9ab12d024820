//! Profit report API Module
//!
//! Admin-only rollups over the order ledger. All routes accept the
//! same window/customer/status filters; cancelled orders are excluded
//! unless a status filter names them explicitly.

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Report router — admin only
pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/admin/reports/profit", routes())
        .layer(middleware::from_fn(require_admin))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/summary", get(handler::summary))
        .route("/consumption", get(handler::consumption))
        .route("/by-order", get(handler::by_order))
        .route("/consumption.csv", get(handler::consumption_csv))
}
