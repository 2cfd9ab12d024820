//! Order domain
//!
//! The order lifecycle: numbering, cost freezing, creation, the status
//! state machine and post-commit side effects. Persistence plumbing
//! lives in `db::repository::order`; this module owns the rules.

pub mod dispatch;
pub mod freeze;
pub mod money;
pub mod numbering;
pub mod service;
pub mod status;

pub use dispatch::Dispatcher;
pub use service::OrderPolicy;

#[cfg(test)]
mod status_tests;
