//! Venue Model

use serde::{Deserialize, Serialize};

/// Venue entity (tenant root)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Venue {
    pub id: i64,
    /// Unique, human-readable identifier used in QR URLs
    pub slug: String,
    pub name: String,
    /// `open` or any other operator-defined value
    pub status: String,
    pub owner_id: i64,
    /// Membership tier of the owner account (`free` | `premium`)
    pub owner_tier: String,
    pub created_at: i64,
}

/// Result of a venue cascade delete
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenueDeleted {
    pub venue_id: i64,
    pub orders_deleted: u64,
    pub items_deleted: u64,
    pub categories_deleted: u64,
}
