//! Collaborator services
//!
//! External collaborators behind trait seams so side-effect heavy code
//! stays testable with in-memory fakes:
//!
//! - [`CatalogLookup`] - product resolution for creation/freezing
//! - [`Mailer`] - transactional mail (best-effort)
//! - [`InvoiceRenderer`] - invoice PDF rendering (best-effort)
//! - [`NotificationQueue`] - push notification enqueueing

pub mod catalog;
pub mod invoice;
pub mod mailer;
pub mod notify;

pub use catalog::{CatalogLookup, DbCatalog};
pub use invoice::{HttpInvoiceRenderer, InvoiceRenderer, InvoiceVars, NoopInvoiceRenderer};
pub use mailer::{HttpMailer, MailAttachment, MailError, MailMessage, Mailer, NoopMailer};
pub use notify::{NotificationQueue, SqliteNotificationQueue};
