//! API route modules
//!
//! # Structure
//!
//! - [`health`] — health check
//! - [`orders`] — order creation, listing and lifecycle
//! - [`reports`] — admin profit reports
//!
//! Each module exposes a `router()` already nested under its `/api/...`
//! prefix; [`build_app`] merges them and applies the shared middleware
//! stack.

pub mod health;
pub mod orders;
pub mod reports;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// HTTP request log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);
    response
}

/// Build the Axum router (without state)
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(reports::router())
}

/// Build the full application: routes, auth middleware and the tower
/// middleware stack.
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // require_auth skips public routes internally
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
}
