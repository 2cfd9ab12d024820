//! Shared fixtures for integration tests: a temp-file SQLite pool with
//! migrations applied and recording fakes for every collaborator.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use shared::models::{Product, PushPayload};
use shared::util::now_millis;
use sqlx::SqlitePool;
use store_server::auth::{CurrentUser, Role};
use store_server::db::DbService;
use store_server::orders::{Dispatcher, OrderPolicy};
use store_server::services::{
    CatalogLookup, InvoiceRenderer, InvoiceVars, MailError, MailMessage, Mailer,
    NotificationQueue,
};
use store_server::utils::AppResult;
use tempfile::TempDir;

/// Fresh database in a temp dir; keep the `TempDir` alive for the test
pub async fn test_pool() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("store.db");
    let db = DbService::new(path.to_str().expect("utf-8 path"))
        .await
        .expect("open test database");
    (db.pool, dir)
}

pub fn product(id: i64, name: &str, price: f64, cost: f64) -> Product {
    let now = now_millis();
    Product {
        id,
        name: name.to_string(),
        price,
        cost,
        image_url: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn customer() -> CurrentUser {
    CurrentUser {
        id: 7,
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        role: Role::Customer,
        phone: Some("+34123456789".to_string()),
        address: Some("1 Calle Mayor".to_string()),
    }
}

pub fn policy() -> OrderPolicy {
    OrderPolicy {
        shipping_fee: 8.0,
        currency: "EUR".to_string(),
    }
}

// =============================================================================
// Collaborator fakes
// =============================================================================

/// In-memory catalog counting every batch lookup
pub struct CountingCatalog {
    products: HashMap<i64, Product>,
    lookups: AtomicUsize,
}

impl CountingCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogLookup for CountingCatalog {
    async fn get_products(&self, ids: &[i64]) -> AppResult<Vec<Product>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(ids
            .iter()
            .filter_map(|id| self.products.get(id).cloned())
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub fn count(&self) -> usize {
        self.sent.lock().expect("mailer lock").len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, msg: &MailMessage) -> Result<(), MailError> {
        self.sent.lock().expect("mailer lock").push(msg.clone());
        Ok(())
    }
}

/// Renderer returning a fixed document
pub struct StubRenderer {
    pub pdf: Option<Vec<u8>>,
}

#[async_trait]
impl InvoiceRenderer for StubRenderer {
    async fn render(&self, _vars: &InvoiceVars) -> Option<Vec<u8>> {
        self.pdf.clone()
    }
}

#[derive(Default)]
pub struct RecordingQueue {
    pub pushes: Mutex<Vec<(i64, PushPayload)>>,
}

impl RecordingQueue {
    pub fn count(&self) -> usize {
        self.pushes.lock().expect("queue lock").len()
    }
}

#[async_trait]
impl NotificationQueue for RecordingQueue {
    async fn enqueue(&self, user_id: i64, payload: &PushPayload) -> AppResult<()> {
        self.pushes
            .lock()
            .expect("queue lock")
            .push((user_id, payload.clone()));
        Ok(())
    }
}

/// Dispatcher wired to recording fakes; returns the fakes for asserts
pub fn recording_dispatcher() -> (Arc<Dispatcher>, Arc<RecordingMailer>, Arc<RecordingQueue>) {
    let mailer = Arc::new(RecordingMailer::default());
    let queue = Arc::new(RecordingQueue::default());
    let dispatcher = Arc::new(Dispatcher::new(
        mailer.clone(),
        Arc::new(StubRenderer {
            pdf: Some(b"%PDF-stub".to_vec()),
        }),
        queue.clone(),
        "Store".to_string(),
    ));
    (dispatcher, mailer, queue)
}

/// Poll until `check` passes; side effects run on a detached task
pub async fn wait_for(mut check: impl FnMut() -> bool) {
    for _ in 0..100 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 1s");
}
