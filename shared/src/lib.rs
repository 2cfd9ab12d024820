//! Shared types for the store backend
//!
//! Domain models and utility functions used by both the server and
//! any API clients. Kept free of server-only dependencies so clients
//! can depend on it without pulling in axum/sqlx (DB row derives are
//! behind the `db` feature).

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
