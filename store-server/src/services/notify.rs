//! Notification Queue
//!
//! Push notifications are enqueued for the live user id; delivery is
//! handled by a separate push worker reading the queue table.

use async_trait::async_trait;
use shared::models::PushPayload;
use sqlx::SqlitePool;

use crate::db::repository::notification;
use crate::utils::AppResult;

#[async_trait]
pub trait NotificationQueue: Send + Sync {
    async fn enqueue(&self, user_id: i64, payload: &PushPayload) -> AppResult<()>;
}

/// Queue backed by the `notification_queue` table
pub struct SqliteNotificationQueue {
    pool: SqlitePool,
}

impl SqliteNotificationQueue {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationQueue for SqliteNotificationQueue {
    async fn enqueue(&self, user_id: i64, payload: &PushPayload) -> AppResult<()> {
        notification::enqueue(&self.pool, user_id, payload).await?;
        Ok(())
    }
}
