//! Store Server — order lifecycle backend
//!
//! # Architecture
//!
//! - **orders** (`orders`): numbering, pricing, cost freezing, the
//!   status state machine and the side-effect dispatcher
//! - **reports** (`reports`): revenue/cost/margin rollups
//! - **database** (`db`): SQLite storage via sqlx, migrations included
//! - **auth** (`auth`): JWT validation and role middleware
//! - **HTTP API** (`api`): RESTful routes under `/api`
//!
//! # Module layout
//!
//! ```text
//! store-server/src/
//! ├── core/          # config, state, server startup
//! ├── auth/          # JWT, CurrentUser, middleware
//! ├── services/      # catalog, mailer, invoice, notifications
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # order domain logic
//! ├── reports/       # profit aggregation
//! ├── db/            # pool + repositories
//! └── utils/         # errors, logging, validation, time
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod reports;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::{Dispatcher, OrderPolicy};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
