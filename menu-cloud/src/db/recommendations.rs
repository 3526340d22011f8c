//! Recommendation source queries
//!
//! Each list skips unavailable partners rather than backfilling them.

use shared::models::RecommendedItem;
use shared::money::PriceBand;
use sqlx::PgPool;

use super::BoxError;

/// Partners with the highest co-occurrence count, ties by partner id
pub async fn frequently_bought_together(
    pool: &PgPool,
    item_id: i64,
    limit: i64,
) -> Result<Vec<RecommendedItem>, BoxError> {
    let rows: Vec<RecommendedItem> = sqlx::query_as(
        r#"
        SELECT i.id, i.name, i.description, i.price, i.image_url, NULL::TEXT AS reason
        FROM (
            SELECT CASE WHEN item_a_id = $1 THEN item_b_id ELSE item_a_id END AS partner_id,
                   co_count
            FROM item_associations
            WHERE item_a_id = $1 OR item_b_id = $1
        ) a
        JOIN items i ON i.id = a.partner_id
        WHERE i.is_available
        ORDER BY a.co_count DESC, a.partner_id
        LIMIT $2
        "#,
    )
    .bind(item_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Stored pairings in display order
pub async fn ai_pairings(
    pool: &PgPool,
    item_id: i64,
    limit: i64,
) -> Result<Vec<RecommendedItem>, BoxError> {
    let rows: Vec<RecommendedItem> = sqlx::query_as(
        r#"
        SELECT i.id, i.name, i.description, i.price, i.image_url, p.reason
        FROM item_pairings p
        JOIN items i ON i.id = p.pairing_item_id
        WHERE p.item_id = $1 AND i.is_available
        ORDER BY p.display_order, p.id
        LIMIT $2
        "#,
    )
    .bind(item_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Random same-category items priced strictly inside the band
pub async fn similar_items(
    pool: &PgPool,
    item_id: i64,
    category_id: i64,
    band: PriceBand,
    limit: i64,
) -> Result<Vec<RecommendedItem>, BoxError> {
    let rows: Vec<RecommendedItem> = sqlx::query_as(
        r#"
        SELECT id, name, description, price, image_url, NULL::TEXT AS reason
        FROM items
        WHERE category_id = $1
          AND id <> $2
          AND is_available
          AND price > $3 AND price < $4
        ORDER BY random()
        LIMIT $5
        "#,
    )
    .bind(category_id)
    .bind(item_id)
    .bind(band.low)
    .bind(band.high)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
