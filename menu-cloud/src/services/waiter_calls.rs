//! Waiter calls from the customer menu

use shared::error::{AppError, ErrorCode};
use shared::models::{WaiterCall, WaiterCallCreate, WaiterCallCreated};
use sqlx::PgPool;

use crate::db;
use crate::error::ServiceResult;
use crate::services::{token_guard, venues};
use crate::util::now_millis;

/// Longest accepted free-text reason
const MAX_REASON_CHARS: usize = 200;

/// Same venue and table token checks as ordering, then a pending call
pub async fn call_waiter(
    pool: &PgPool,
    payload: &WaiterCallCreate,
) -> ServiceResult<WaiterCallCreated> {
    let venue = venues::find_venue(pool, &payload.venue_slug).await?;
    token_guard::require_valid(
        pool,
        venue.id,
        payload.table_number,
        payload.table_token.as_deref(),
    )
    .await?;

    let reason = payload
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());
    if reason.is_some_and(|r| r.chars().count() > MAX_REASON_CHARS) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("reason must be at most {MAX_REASON_CHARS} characters"),
        )
        .into());
    }

    let call_id =
        db::waiter_calls::insert(pool, venue.id, payload.table_number, reason, now_millis())
            .await?;
    tracing::info!(call_id, venue_id = venue.id, table_number = payload.table_number, "Waiter called");
    Ok(WaiterCallCreated { call_id })
}

pub async fn list_pending(pool: &PgPool, venue_id: i64) -> ServiceResult<Vec<WaiterCall>> {
    Ok(db::waiter_calls::list_pending(pool, venue_id).await?)
}

/// Resolving an already resolved call succeeds
pub async fn resolve(pool: &PgPool, venue_id: i64, call_id: i64) -> ServiceResult<WaiterCall> {
    let call = db::waiter_calls::resolve(pool, venue_id, call_id, now_millis())
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::WaiterCallNotFound).with_detail("call_id", call_id)
        })?;
    tracing::info!(call_id, venue_id, "Waiter call resolved");
    Ok(call)
}
