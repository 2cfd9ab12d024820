use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::orders::{Dispatcher, OrderPolicy};
use crate::services::{
    CatalogLookup, DbCatalog, HttpInvoiceRenderer, HttpMailer, InvoiceRenderer, Mailer,
    NoopInvoiceRenderer, NoopMailer, SqliteNotificationQueue,
};
use crate::utils::AppError;

/// Server state — shared references to every service.
///
/// `Clone` is a shallow Arc copy, so handlers and middleware can take
/// the state by value.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | immutable configuration |
/// | pool | SQLite connection pool |
/// | jwt_service | token validation |
/// | catalog | product lookups for pricing/cost freezing |
/// | dispatcher | post-transition side effects |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub catalog: Arc<dyn CatalogLookup>,
    pub dispatcher: Arc<Dispatcher>,
}

impl ServerState {
    /// Initialize every service from configuration: open the database,
    /// run migrations and wire the collaborator implementations. Falls
    /// back to no-op mail/invoice collaborators when their gateways are
    /// not configured, so a bare development setup still runs.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        let pool = db.pool;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let catalog: Arc<dyn CatalogLookup> = Arc::new(DbCatalog::new(pool.clone()));

        let mailer: Arc<dyn Mailer> = match &config.mail_gateway_url {
            Some(url) => Arc::new(HttpMailer::new(url.clone())),
            None => {
                tracing::warn!("MAIL_GATEWAY_URL not set, outgoing mail disabled");
                Arc::new(NoopMailer)
            }
        };
        let renderer: Arc<dyn InvoiceRenderer> = match &config.invoice_renderer_url {
            Some(url) => Arc::new(HttpInvoiceRenderer::new(url.clone())),
            None => Arc::new(NoopInvoiceRenderer),
        };
        let queue = Arc::new(SqliteNotificationQueue::new(pool.clone()));
        let dispatcher = Arc::new(Dispatcher::new(
            mailer,
            renderer,
            queue,
            config.brand_name.clone(),
        ));

        Ok(Self {
            config: config.clone(),
            pool,
            jwt_service,
            catalog,
            dispatcher,
        })
    }

    pub fn order_policy(&self) -> OrderPolicy {
        self.config.order_policy()
    }
}
