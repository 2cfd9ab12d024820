//! Push Notification Models

use serde::{Deserialize, Serialize};

/// Push notification content, enqueued for the live user id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

/// Queued push record as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct NotificationRecord {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    /// JSON-encoded payload data
    pub data: Option<String>,
    pub created_at: i64,
}
