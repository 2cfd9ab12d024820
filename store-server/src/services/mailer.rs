//! Mailer
//!
//! Best-effort transactional mail. The production implementation posts
//! to a mail gateway over HTTP; errors surface as `MailError` and are
//! logged at the dispatcher boundary, never propagated further.

use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;
use thiserror::Error;

/// Binary attachment (invoice PDF)
#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// Outbound email
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub attachments: Vec<MailAttachment>,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail gateway error: {0}")]
    Gateway(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, msg: &MailMessage) -> Result<(), MailError>;
}

// =============================================================================
// HTTP gateway implementation
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GatewayAttachment<'a> {
    filename: &'a str,
    content_type: &'a str,
    /// base64-encoded bytes
    content: String,
}

#[derive(Serialize)]
struct GatewayRequest<'a> {
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    attachments: Vec<GatewayAttachment<'a>>,
}

/// Mailer posting JSON to a configured HTTP mail gateway
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMailer {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, msg: &MailMessage) -> Result<(), MailError> {
        let body = GatewayRequest {
            to: &msg.to,
            subject: &msg.subject,
            html: &msg.html,
            attachments: msg
                .attachments
                .iter()
                .map(|a| GatewayAttachment {
                    filename: &a.filename,
                    content_type: &a.content_type,
                    content: base64::engine::general_purpose::STANDARD.encode(&a.content),
                })
                .collect(),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailError::Gateway(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MailError::Gateway(format!(
                "gateway returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

/// Mailer used when no gateway is configured; logs and drops the mail
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, msg: &MailMessage) -> Result<(), MailError> {
        tracing::info!(to = %msg.to, subject = %msg.subject, "Mail gateway not configured, dropping mail");
        Ok(())
    }
}
