//! Menu Models (categories, items, variants, add-ons)

use serde::{Deserialize, Serialize};

/// Category entity, ordered by `display_order`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub venue_id: i64,
    pub name: String,
    pub display_order: i32,
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub is_available: bool,
    pub calories: Option<i32>,
    pub allergens: Option<String>,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub created_at: i64,
}

/// Create item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreate {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub calories: Option<i32>,
    pub allergens: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
}

/// Item creation result, including the pairings found for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreated {
    pub item: Item,
    pub pairings_created: usize,
}

/// Size/portion variant; its price replaces the item price
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Variant {
    pub id: i64,
    pub item_id: i64,
    pub name: String,
    pub price: f64,
}

/// Add-on selectable on an item; its price is added per unit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Addon {
    pub id: i64,
    pub item_id: i64,
    pub name: String,
    pub price: f64,
}
