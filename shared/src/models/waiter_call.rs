//! Waiter Call Model

use serde::{Deserialize, Serialize};

pub const WAITER_CALL_PENDING: &str = "pending";
pub const WAITER_CALL_RESOLVED: &str = "resolved";

/// Customer request for table service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct WaiterCall {
    pub id: i64,
    pub venue_id: i64,
    pub table_number: i32,
    pub reason: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub resolved_at: Option<i64>,
}

/// Waiter call payload (sent from the customer menu)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaiterCallCreate {
    pub venue_slug: String,
    pub table_number: i32,
    pub table_token: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaiterCallCreated {
    pub call_id: i64,
}
