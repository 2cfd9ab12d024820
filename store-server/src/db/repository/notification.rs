//! Notification Queue Repository

use super::RepoResult;
use shared::models::{NotificationRecord, PushPayload};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Enqueue a push record for later delivery by the push worker
pub async fn enqueue(pool: &SqlitePool, user_id: i64, payload: &PushPayload) -> RepoResult<i64> {
    let id = snowflake_id();
    let data = serde_json::to_string(&payload.data).ok();
    sqlx::query(
        "INSERT INTO notification_queue (id, user_id, title, body, data, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(&payload.title)
    .bind(&payload.body)
    .bind(data)
    .bind(now_millis())
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<NotificationRecord>> {
    let rows = sqlx::query_as::<_, NotificationRecord>(
        "SELECT id, user_id, title, body, data, created_at FROM notification_queue \
         WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
