use crate::auth::JwtConfig;
use crate::orders::OrderPolicy;

/// Server configuration
///
/// Every item can be overridden through environment variables:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/store | working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | DATABASE_PATH | {WORK_DIR}/store.db | SQLite database file |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | SHIPPING_FEE | 8.0 | flat shipping fee per order |
/// | CURRENCY | EUR | display currency code |
/// | BRAND_NAME | Store | brand used in customer email/invoices |
/// | MAIL_GATEWAY_URL | (unset) | HTTP mail gateway; unset = no-op mailer |
/// | INVOICE_RENDERER_URL | (unset) | HTTP invoice renderer; unset = no invoices |
/// | LOG_LEVEL | info | tracing filter |
/// | LOG_DIR | (unset) | rolling file logs when set |
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub database_path: String,
    pub jwt: JwtConfig,
    /// development | staging | production
    pub environment: String,
    pub shipping_fee: f64,
    pub currency: String,
    pub brand_name: String,
    pub mail_gateway_url: Option<String>,
    pub invoice_renderer_url: Option<String>,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/store".into());
        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| format!("{work_dir}/store.db"));
        Self {
            work_dir,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path,
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            shipping_fee: std::env::var("SHIPPING_FEE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8.0),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "EUR".into()),
            brand_name: std::env::var("BRAND_NAME").unwrap_or_else(|_| "Store".into()),
            mail_gateway_url: std::env::var("MAIL_GATEWAY_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            invoice_renderer_url: std::env::var("INVOICE_RENDERER_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Pricing policy applied to new orders
    pub fn order_policy(&self) -> OrderPolicy {
        OrderPolicy {
            shipping_fee: self.shipping_fee,
            currency: self.currency.clone(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
