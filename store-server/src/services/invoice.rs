//! Invoice Renderer
//!
//! Renders an invoice PDF from mapped template variables. Rendering is
//! best-effort: any failure yields `None` and the dispatcher simply
//! omits the attachment.

use async_trait::async_trait;
use serde::Serialize;
use shared::models::Order;

use crate::utils::time::millis_to_rfc3339;

/// One invoice line
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub name: String,
    pub qty: i64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Template variables fed to the renderer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceVars {
    pub brand: String,
    pub order_number: i64,
    pub date: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub currency: String,
    pub items: Vec<InvoiceLine>,
    pub subtotal: f64,
    pub shipping_fee: f64,
    pub total: f64,
}

impl InvoiceVars {
    /// Map an order snapshot into invoice variables
    pub fn from_order(order: &Order, brand: &str) -> Self {
        Self {
            brand: brand.to_string(),
            order_number: order.number,
            date: millis_to_rfc3339(order.created_at),
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            customer_phone: order.customer_phone.clone(),
            customer_address: order.customer_address.clone(),
            currency: order.currency.clone(),
            items: order
                .items
                .iter()
                .map(|i| InvoiceLine {
                    name: i.name.clone(),
                    qty: i.qty,
                    unit_price: i.price,
                    line_total: i.price * i.qty as f64,
                })
                .collect(),
            subtotal: order.subtotal,
            shipping_fee: order.shipping_fee,
            total: order.total,
        }
    }
}

#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
    /// Render the invoice document; `None` on any failure
    async fn render(&self, vars: &InvoiceVars) -> Option<Vec<u8>>;
}

/// Renderer posting template vars to an HTTP PDF service
pub struct HttpInvoiceRenderer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpInvoiceRenderer {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl InvoiceRenderer for HttpInvoiceRenderer {
    async fn render(&self, vars: &InvoiceVars) -> Option<Vec<u8>> {
        let resp = match self.client.post(&self.endpoint).json(vars).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "Invoice renderer unreachable");
                return None;
            }
        };
        if !resp.status().is_success() {
            tracing::warn!(status = %resp.status(), "Invoice renderer returned error");
            return None;
        }
        match resp.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read invoice renderer response");
                None
            }
        }
    }
}

/// Renderer used when no PDF service is configured
pub struct NoopInvoiceRenderer;

#[async_trait]
impl InvoiceRenderer for NoopInvoiceRenderer {
    async fn render(&self, _vars: &InvoiceVars) -> Option<Vec<u8>> {
        None
    }
}
