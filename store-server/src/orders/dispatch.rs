//! Side-Effect Dispatcher
//!
//! Runs after a committed status transition: composes the
//! status-specific customer message, sends the email, enqueues a push
//! record, and on confirmation attaches a rendered invoice. Every
//! sub-step is independently caught and logged; no failure here can
//! reach the transition caller or the already-durable status change.

use std::sync::Arc;

use shared::models::{Order, OrderStatus, PushPayload};

use crate::services::{
    InvoiceRenderer, InvoiceVars, MailAttachment, MailMessage, Mailer, NotificationQueue,
};

pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
    renderer: Arc<dyn InvoiceRenderer>,
    queue: Arc<dyn NotificationQueue>,
    brand: String,
}

impl Dispatcher {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        renderer: Arc<dyn InvoiceRenderer>,
        queue: Arc<dyn NotificationQueue>,
        brand: String,
    ) -> Self {
        Self {
            mailer,
            renderer,
            queue,
            brand,
        }
    }

    /// Detach the dispatch from the calling request
    pub fn spawn(self: &Arc<Self>, order: Order, previous: OrderStatus, new_status: OrderStatus) {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            dispatcher.dispatch(&order, previous, new_status).await;
        });
    }

    /// Run all side effects for a committed transition. Never fails.
    pub async fn dispatch(&self, order: &Order, previous: OrderStatus, new_status: OrderStatus) {
        tracing::debug!(
            order_id = order.id,
            from = %previous,
            to = %new_status,
            "Dispatching status side effects"
        );

        let (subject, html, push_body) = status_message(order, new_status);

        // Invoice only on confirmation; rendering failure just omits
        // the attachment.
        let mut attachments = Vec::new();
        if new_status == OrderStatus::Confirmed {
            let vars = InvoiceVars::from_order(order, &self.brand);
            match self.renderer.render(&vars).await {
                Some(bytes) => attachments.push(MailAttachment {
                    filename: format!("invoice-{}.pdf", order.number),
                    content_type: "application/pdf".to_string(),
                    content: bytes,
                }),
                None => {
                    tracing::warn!(order_id = order.id, "Invoice rendering failed, sending mail without attachment")
                }
            }
        }

        let mail = MailMessage {
            to: order.customer_email.clone(),
            subject: subject.clone(),
            html,
            attachments,
        };
        if let Err(e) = self.mailer.send(&mail).await {
            tracing::warn!(order_id = order.id, error = %e, "Status mail failed");
        }

        let payload = PushPayload {
            title: subject,
            body: push_body,
            data: serde_json::json!({
                "orderId": order.id,
                "number": order.number,
                "status": new_status,
            }),
        };
        if let Err(e) = self.queue.enqueue(order.customer_id, &payload).await {
            tracing::warn!(order_id = order.id, error = %e, "Push enqueue failed");
        }
    }
}

/// Status-specific customer-facing message: (subject, html body, push body)
pub fn status_message(order: &Order, status: OrderStatus) -> (String, String, String) {
    let number = order.number;
    let name = &order.customer_name;
    let (subject, line) = match status {
        OrderStatus::Pending => (
            format!("Order #{number} received"),
            "We have received your order and will confirm it shortly.".to_string(),
        ),
        OrderStatus::Confirmed => (
            format!("Order #{number} confirmed"),
            "Your order is confirmed. Your invoice is attached.".to_string(),
        ),
        OrderStatus::Shipped => (
            format!("Order #{number} shipped"),
            "Your order is on its way.".to_string(),
        ),
        OrderStatus::Delivered => (
            format!("Order #{number} delivered"),
            "Your order has been delivered. Enjoy!".to_string(),
        ),
        OrderStatus::Cancelled => (
            format!("Order #{number} cancelled"),
            "Your order has been cancelled. Contact us if this is unexpected.".to_string(),
        ),
    };
    let html = format!(
        "<p>Dear {name},</p><p>{line}</p><p>Order total: {:.2} {}</p>",
        order.total, order.currency
    );
    (subject, html, line)
}
