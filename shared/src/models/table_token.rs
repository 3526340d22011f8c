//! Table Token Model

use serde::{Deserialize, Serialize};

/// Per-table QR secret
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TableToken {
    pub id: i64,
    pub venue_id: i64,
    pub table_number: i32,
    pub token: String,
    pub active: bool,
    pub created_at: i64,
    pub last_used: Option<i64>,
}

/// Issue (or re-issue) payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableTokenIssue {
    pub table_number: i32,
}

/// Why a table token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenRejection {
    /// No token was ever issued for this table
    NotIssued,
    /// Token was revoked
    Inactive,
    /// Token string differs (regenerated, or issued for another table/venue)
    Mismatch,
}

impl TokenRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotIssued => "not_issued",
            Self::Inactive => "inactive",
            Self::Mismatch => "mismatch",
        }
    }
}

/// Outcome of a table token validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<TokenRejection>,
    /// Row id of the matched token (valid checks only)
    #[serde(skip)]
    pub token_id: Option<i64>,
}

impl TokenCheck {
    pub fn accepted(token_id: i64) -> Self {
        Self {
            valid: true,
            reason: None,
            token_id: Some(token_id),
        }
    }

    pub fn rejected(reason: TokenRejection) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
            token_id: None,
        }
    }
}
