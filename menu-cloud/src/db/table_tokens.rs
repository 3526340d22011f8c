//! Table token storage
//!
//! At most one row per (venue, table): issuing upserts, so the previous
//! secret stops working the moment a new one is written.

use shared::models::TableToken;
use sqlx::PgPool;

use super::BoxError;

const COLUMNS: &str = "id, venue_id, table_number, token, active, created_at, last_used";

pub async fn find_for_table(
    pool: &PgPool,
    venue_id: i64,
    table_number: i32,
) -> Result<Option<TableToken>, BoxError> {
    let row: Option<TableToken> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM table_tokens WHERE venue_id = $1 AND table_number = $2"
    ))
    .bind(venue_id)
    .bind(table_number)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn list(pool: &PgPool, venue_id: i64) -> Result<Vec<TableToken>, BoxError> {
    let rows: Vec<TableToken> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM table_tokens WHERE venue_id = $1 ORDER BY table_number"
    ))
    .bind(venue_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Write a fresh secret for the table, reactivating it
pub async fn issue(
    pool: &PgPool,
    venue_id: i64,
    table_number: i32,
    token: &str,
    now: i64,
) -> Result<TableToken, BoxError> {
    let row: TableToken = sqlx::query_as(&format!(
        r#"
        INSERT INTO table_tokens (venue_id, table_number, token, active, created_at, last_used)
        VALUES ($1, $2, $3, TRUE, $4, NULL)
        ON CONFLICT (venue_id, table_number)
        DO UPDATE SET
            token = EXCLUDED.token, active = TRUE,
            created_at = EXCLUDED.created_at, last_used = NULL
        RETURNING {COLUMNS}
        "#
    ))
    .bind(venue_id)
    .bind(table_number)
    .bind(token)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Deactivate a token; `None` when the id is not a token of this venue
pub async fn revoke(
    pool: &PgPool,
    venue_id: i64,
    token_id: i64,
) -> Result<Option<TableToken>, BoxError> {
    let row: Option<TableToken> = sqlx::query_as(&format!(
        "UPDATE table_tokens SET active = FALSE WHERE id = $1 AND venue_id = $2 RETURNING {COLUMNS}"
    ))
    .bind(token_id)
    .bind(venue_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn touch(pool: &PgPool, token_id: i64, now: i64) -> Result<(), BoxError> {
    sqlx::query("UPDATE table_tokens SET last_used = $1 WHERE id = $2")
        .bind(now)
        .bind(token_id)
        .execute(pool)
        .await?;
    Ok(())
}
