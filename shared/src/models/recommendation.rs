//! Recommendation Models

use serde::{Deserialize, Serialize};

/// Display data of a recommended item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RecommendedItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    /// Pairing reason (AI pairings only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Three independently sourced lists; the same item may appear in several
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    pub item_id: i64,
    pub frequently_bought_together: Vec<RecommendedItem>,
    pub ai_pairings: Vec<RecommendedItem>,
    pub similar_items: Vec<RecommendedItem>,
}
