//! Venue lookup and cascade delete

use shared::models::{Venue, VenueDeleted};
use sqlx::PgPool;

use super::BoxError;

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Venue>, BoxError> {
    let row: Option<Venue> = sqlx::query_as(
        r#"
        SELECT v.id, v.slug, v.name, v.status, v.owner_id, u.tier AS owner_tier, v.created_at
        FROM venues v
        JOIN users u ON u.id = v.owner_id
        WHERE v.slug = $1
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Delete a venue and everything it owns, children first, in one transaction
pub async fn delete_cascade(pool: &PgPool, venue_id: i64) -> Result<VenueDeleted, BoxError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM table_tokens WHERE venue_id = $1")
        .bind(venue_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM waiter_calls WHERE venue_id = $1")
        .bind(venue_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        DELETE FROM order_addons WHERE order_item_id IN (
            SELECT oi.id FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            WHERE o.venue_id = $1
        )
        "#,
    )
    .bind(venue_id)
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "DELETE FROM order_items WHERE order_id IN (SELECT id FROM orders WHERE venue_id = $1)",
    )
    .bind(venue_id)
    .execute(&mut *tx)
    .await?;
    let orders_deleted = sqlx::query("DELETE FROM orders WHERE venue_id = $1")
        .bind(venue_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    const VENUE_ITEMS: &str = "SELECT i.id FROM items i JOIN categories c ON c.id = i.category_id WHERE c.venue_id = $1";

    sqlx::query(&format!(
        "DELETE FROM item_pairings WHERE item_id IN ({VENUE_ITEMS}) OR pairing_item_id IN ({VENUE_ITEMS})"
    ))
    .bind(venue_id)
    .execute(&mut *tx)
    .await?;
    sqlx::query(&format!(
        "DELETE FROM item_associations WHERE item_a_id IN ({VENUE_ITEMS}) OR item_b_id IN ({VENUE_ITEMS})"
    ))
    .bind(venue_id)
    .execute(&mut *tx)
    .await?;
    sqlx::query(&format!("DELETE FROM addons WHERE item_id IN ({VENUE_ITEMS})"))
        .bind(venue_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!("DELETE FROM variants WHERE item_id IN ({VENUE_ITEMS})"))
        .bind(venue_id)
        .execute(&mut *tx)
        .await?;
    let items_deleted = sqlx::query(&format!("DELETE FROM items WHERE id IN ({VENUE_ITEMS})"))
        .bind(venue_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let categories_deleted = sqlx::query("DELETE FROM categories WHERE venue_id = $1")
        .bind(venue_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    sqlx::query("DELETE FROM venues WHERE id = $1")
        .bind(venue_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(VenueDeleted {
        venue_id,
        orders_deleted,
        items_deleted,
        categories_deleted,
    })
}

/// Owner of a venue, `None` if the venue does not exist
pub async fn find_owner(pool: &PgPool, venue_id: i64) -> Result<Option<i64>, BoxError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT owner_id FROM venues WHERE id = $1")
        .bind(venue_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(owner_id,)| owner_id))
}
