//! Waiter call storage

use shared::models::{WAITER_CALL_PENDING, WAITER_CALL_RESOLVED, WaiterCall};
use sqlx::PgPool;

use super::BoxError;

const COLUMNS: &str = "id, venue_id, table_number, reason, status, created_at, resolved_at";

pub async fn insert(
    pool: &PgPool,
    venue_id: i64,
    table_number: i32,
    reason: Option<&str>,
    now: i64,
) -> Result<i64, BoxError> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO waiter_calls (venue_id, table_number, reason, status, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(venue_id)
    .bind(table_number)
    .bind(reason)
    .bind(WAITER_CALL_PENDING)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Pending calls, oldest first
pub async fn list_pending(pool: &PgPool, venue_id: i64) -> Result<Vec<WaiterCall>, BoxError> {
    let rows: Vec<WaiterCall> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM waiter_calls WHERE venue_id = $1 AND status = $2 ORDER BY created_at, id"
    ))
    .bind(venue_id)
    .bind(WAITER_CALL_PENDING)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Mark resolved, keeping the first resolution time on repeats
pub async fn resolve(
    pool: &PgPool,
    venue_id: i64,
    call_id: i64,
    now: i64,
) -> Result<Option<WaiterCall>, BoxError> {
    let row: Option<WaiterCall> = sqlx::query_as(&format!(
        r#"
        UPDATE waiter_calls
        SET status = $1, resolved_at = COALESCE(resolved_at, $2)
        WHERE id = $3 AND venue_id = $4
        RETURNING {COLUMNS}
        "#
    ))
    .bind(WAITER_CALL_RESOLVED)
    .bind(now)
    .bind(call_id)
    .bind(venue_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
