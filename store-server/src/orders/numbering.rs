//! Order Numbering Sequencer
//!
//! Issues unique, strictly increasing human-readable order numbers.
//! The counter row is bumped with a single atomic UPDATE..RETURNING, so
//! two concurrent creations can never observe the same value; SQLite
//! serializes the write. Busy contention is retried a bounded number of
//! times before surfacing as a transient error.

use std::time::Duration;

use sqlx::SqlitePool;

use crate::db::repository::{RepoError, RepoResult};

const MAX_ATTEMPTS: u32 = 3;

/// Next order number, strictly greater than every previously issued one.
/// The counter is seeded at 1000, so the first number is 1001.
pub async fn next_order_number(pool: &SqlitePool) -> RepoResult<i64> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let result: Result<i64, sqlx::Error> = sqlx::query_scalar(
            "UPDATE order_counter SET value = value + 1 WHERE id = 1 RETURNING value",
        )
        .fetch_one(pool)
        .await;

        match result {
            Ok(number) => return Ok(number),
            Err(e) => {
                let err = RepoError::from(e);
                if err.is_busy() && attempt < MAX_ATTEMPTS {
                    tracing::debug!(attempt, "Order counter busy, retrying");
                    tokio::time::sleep(Duration::from_millis(10 * attempt as u64)).await;
                    continue;
                }
                return Err(err);
            }
        }
    }
}
