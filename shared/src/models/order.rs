//! Order Model

use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// `placed → preparing` happens automatically; `delivered` and `completed`
/// are set by the venue operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Placed,
    Preparing,
    Delivered,
    Completed,
}

impl OrderStatus {
    /// Parse from database string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "placed" => Some(Self::Placed),
            "preparing" => Some(Self::Preparing),
            "delivered" => Some(Self::Delivered),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Preparing => "preparing",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
        }
    }

    /// Does reaching this status feed the co-occurrence recommender?
    pub fn records_associations(&self) -> bool {
        matches!(self, Self::Delivered | Self::Completed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db())
    }
}

/// Order with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub venue_id: i64,
    pub table_number: i32,
    pub total: f64,
    pub status: OrderStatus,
    pub customer_session: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub lines: Vec<OrderLine>,
}

/// One cart line of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub item_id: i64,
    pub item_name: String,
    pub variant_id: Option<i64>,
    pub quantity: i32,
    pub notes: Option<String>,
    pub addon_ids: Vec<i64>,
}

/// Place order payload (sent from the customer menu)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub venue_slug: String,
    pub table_number: i32,
    /// Secret from the table QR code
    pub table_token: Option<String>,
    pub items: Vec<OrderLineInput>,
    /// Client-computed total, checked against menu prices
    pub total: f64,
    pub notes: Option<String>,
}

/// Cart line payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub item_id: i64,
    pub variant_id: Option<i64>,
    pub quantity: i32,
    pub notes: Option<String>,
    #[serde(default)]
    pub addon_ids: Vec<i64>,
}

/// Place order result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: i64,
    /// Human-readable estimate, e.g. "14-19 minutes"
    pub eta: String,
    pub customer_session: String,
    pub total: f64,
}

/// Operator status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: String,
}

/// Operator status update result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: i64,
    pub status: OrderStatus,
    /// True only for the update that recorded this order's item associations
    pub associations_recorded: bool,
}
