//! Table token guard
//!
//! A table token is the secret printed in a table's QR code. Customer actions
//! (ordering, calling a waiter) must present the current token for that exact
//! venue and table.

use shared::error::{AppError, ErrorCode};
use shared::models::{TableToken, TokenCheck, TokenRejection};
use sqlx::PgPool;

use crate::db;
use crate::error::ServiceResult;
use crate::util::{generate_table_token, now_millis};

/// Judge a supplied secret against the stored row for the table
pub fn check_token(row: Option<&TableToken>, supplied: &str) -> TokenCheck {
    match row {
        None => TokenCheck::rejected(TokenRejection::NotIssued),
        Some(t) if !t.active => TokenCheck::rejected(TokenRejection::Inactive),
        Some(t) if t.token != supplied => TokenCheck::rejected(TokenRejection::Mismatch),
        Some(t) => TokenCheck::accepted(t.id),
    }
}

/// A missing token is a different error from a wrong one
pub fn require_table_token(token: Option<&str>) -> Result<&str, AppError> {
    match token {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(AppError::new(ErrorCode::TableTokenRequired)),
    }
}

fn validate_table_number(table_number: i32) -> Result<(), AppError> {
    if table_number < 1 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "table_number must be at least 1",
        )
        .with_detail("table_number", table_number));
    }
    Ok(())
}

/// Validate a token; a valid one gets `last_used` refreshed best-effort
pub async fn validate(
    pool: &PgPool,
    venue_id: i64,
    table_number: i32,
    token: &str,
) -> ServiceResult<TokenCheck> {
    let row = db::table_tokens::find_for_table(pool, venue_id, table_number).await?;
    let check = check_token(row.as_ref(), token);

    if let Some(token_id) = check.token_id
        && let Err(e) = db::table_tokens::touch(pool, token_id, now_millis()).await
    {
        tracing::warn!(token_id, error = %e, "Failed to update table token last_used");
    }
    Ok(check)
}

/// Fail with `TableTokenRequired` / `TableTokenInvalid` unless the token is good
pub async fn require_valid(
    pool: &PgPool,
    venue_id: i64,
    table_number: i32,
    token: Option<&str>,
) -> ServiceResult<()> {
    let token = require_table_token(token)?;
    let check = validate(pool, venue_id, table_number, token).await?;
    if let Some(reason) = check.reason {
        tracing::info!(venue_id, table_number, reason = reason.as_str(), "Table token rejected");
        return Err(AppError::new(ErrorCode::TableTokenInvalid)
            .with_detail("reason", reason.as_str())
            .into());
    }
    Ok(())
}

/// Issue (or re-issue) the token of a table; the previous secret dies immediately
pub async fn issue(pool: &PgPool, venue_id: i64, table_number: i32) -> ServiceResult<TableToken> {
    validate_table_number(table_number)?;
    let token = db::table_tokens::issue(
        pool,
        venue_id,
        table_number,
        &generate_table_token(),
        now_millis(),
    )
    .await?;
    tracing::info!(venue_id, table_number, token_id = token.id, "Table token issued");
    Ok(token)
}

/// Deactivate a token; revoking twice is fine
pub async fn revoke(pool: &PgPool, venue_id: i64, token_id: i64) -> ServiceResult<TableToken> {
    let token = db::table_tokens::revoke(pool, venue_id, token_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TableTokenNotFound).with_detail("id", token_id))?;
    tracing::info!(venue_id, token_id, "Table token revoked");
    Ok(token)
}

pub async fn list(pool: &PgPool, venue_id: i64) -> ServiceResult<Vec<TableToken>> {
    Ok(db::table_tokens::list(pool, venue_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(token: &str, active: bool) -> TableToken {
        TableToken {
            id: 11,
            venue_id: 1,
            table_number: 5,
            token: token.to_string(),
            active,
            created_at: 0,
            last_used: None,
        }
    }

    #[test]
    fn accepts_exact_active_token() {
        let check = check_token(Some(&row("abc123", true)), "abc123");
        assert!(check.valid);
        assert_eq!(check.reason, None);
        assert_eq!(check.token_id, Some(11));
    }

    #[test]
    fn rejection_reasons() {
        assert_eq!(
            check_token(None, "abc123").reason,
            Some(TokenRejection::NotIssued)
        );
        assert_eq!(
            check_token(Some(&row("abc123", false)), "abc123").reason,
            Some(TokenRejection::Inactive)
        );
        // Comparison is exact, case included
        assert_eq!(
            check_token(Some(&row("abc123", true)), "ABC123").reason,
            Some(TokenRejection::Mismatch)
        );
    }

    #[test]
    fn reissued_token_invalidates_previous_secret() {
        let old = row("old-secret", true);
        let reissued = TableToken {
            token: "new-secret".into(),
            ..old.clone()
        };
        assert!(check_token(Some(&old), "old-secret").valid);
        assert_eq!(
            check_token(Some(&reissued), "old-secret").reason,
            Some(TokenRejection::Mismatch)
        );
        assert!(check_token(Some(&reissued), "new-secret").valid);
    }

    #[test]
    fn missing_token_is_its_own_error() {
        assert_eq!(
            require_table_token(None).unwrap_err().code,
            ErrorCode::TableTokenRequired
        );
        assert_eq!(
            require_table_token(Some("  ")).unwrap_err().code,
            ErrorCode::TableTokenRequired
        );
        assert_eq!(require_table_token(Some("abc123")).unwrap(), "abc123");
    }

    #[test]
    fn rejection_serializes_reason_only() {
        let json = serde_json::to_value(TokenCheck::rejected(TokenRejection::NotIssued)).unwrap();
        assert_eq!(json, serde_json::json!({"valid": false, "reason": "not_issued"}));
    }

    #[test]
    fn table_numbers_start_at_one() {
        assert!(validate_table_number(1).is_ok());
        assert_eq!(
            validate_table_number(0).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }
}
