//! Menu item queries: lookup, creation, cart pricing data, pairings

use shared::models::{Addon, Item, ItemCreate, Variant};
use sqlx::PgPool;

use super::BoxError;
use crate::services::pairing::Candidate;

const ITEM_COLUMNS: &str = "i.id, i.category_id, i.name, i.description, i.price, i.is_available, \
     i.calories, i.allergens, i.tags, i.image_url, i.created_at";

pub async fn find(pool: &PgPool, item_id: i64) -> Result<Option<Item>, BoxError> {
    let row: Option<Item> =
        sqlx::query_as(&format!("SELECT {ITEM_COLUMNS} FROM items i WHERE i.id = $1"))
            .bind(item_id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

/// Does the category belong to the venue?
pub async fn category_in_venue(
    pool: &PgPool,
    venue_id: i64,
    category_id: i64,
) -> Result<bool, BoxError> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM categories WHERE id = $1 AND venue_id = $2")
            .bind(category_id)
            .bind(venue_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

pub async fn create(pool: &PgPool, data: &ItemCreate, now: i64) -> Result<Item, BoxError> {
    let row: Item = sqlx::query_as(&format!(
        r#"
        INSERT INTO items AS i (
            category_id, name, description, price, is_available,
            calories, allergens, tags, image_url, created_at
        )
        VALUES ($1, $2, $3, $4, TRUE, $5, $6, $7, $8, $9)
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(data.category_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.calories)
    .bind(&data.allergens)
    .bind(&data.tags)
    .bind(&data.image_url)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Other items of the venue a new item may be paired with
pub async fn pairing_candidates(
    pool: &PgPool,
    venue_id: i64,
    exclude_item_id: i64,
) -> Result<Vec<Candidate>, BoxError> {
    let rows: Vec<Candidate> = sqlx::query_as(
        r#"
        SELECT i.id, i.name
        FROM items i
        JOIN categories c ON c.id = i.category_id
        WHERE c.venue_id = $1 AND i.id <> $2
        ORDER BY c.display_order, i.id
        "#,
    )
    .bind(venue_id)
    .bind(exclude_item_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Store pairings with `display_order` following slice order
pub async fn insert_pairings(
    pool: &PgPool,
    item_id: i64,
    pairings: &[(i64, String)],
) -> Result<(), BoxError> {
    let mut tx = pool.begin().await?;
    for (display_order, (partner_id, reason)) in pairings.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO item_pairings (item_id, pairing_item_id, reason, display_order)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (item_id, pairing_item_id) DO NOTHING
            "#,
        )
        .bind(item_id)
        .bind(partner_id)
        .bind(reason)
        .bind(display_order as i32)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Pricing view of an item within a venue
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PricedItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub is_available: bool,
}

/// Everything needed to price a cart, restricted to one venue
#[derive(Debug, Clone, Default)]
pub struct CartCatalog {
    pub items: Vec<PricedItem>,
    pub variants: Vec<Variant>,
    pub addons: Vec<Addon>,
}

/// Load the requested items (only those of this venue) with their variants and add-ons
pub async fn cart_catalog(
    pool: &PgPool,
    venue_id: i64,
    item_ids: &[i64],
) -> Result<CartCatalog, BoxError> {
    let items: Vec<PricedItem> = sqlx::query_as(
        r#"
        SELECT i.id, i.name, i.price, i.is_available
        FROM items i
        JOIN categories c ON c.id = i.category_id
        WHERE c.venue_id = $1 AND i.id = ANY($2)
        "#,
    )
    .bind(venue_id)
    .bind(item_ids)
    .fetch_all(pool)
    .await?;

    let found: Vec<i64> = items.iter().map(|i| i.id).collect();

    let variants: Vec<Variant> = sqlx::query_as(
        "SELECT id, item_id, name, price FROM variants WHERE item_id = ANY($1)",
    )
    .bind(&found)
    .fetch_all(pool)
    .await?;

    let addons: Vec<Addon> =
        sqlx::query_as("SELECT id, item_id, name, price FROM addons WHERE item_id = ANY($1)")
            .bind(&found)
            .fetch_all(pool)
            .await?;

    Ok(CartCatalog {
        items,
        variants,
        addons,
    })
}
