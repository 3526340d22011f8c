//! Venue resolution and cascade delete

use shared::error::{AppError, ErrorCode};
use shared::models::{Venue, VenueDeleted};
use sqlx::PgPool;

use crate::db;
use crate::error::ServiceResult;

/// Venue by slug, or `VenueNotFound`
pub async fn find_venue(pool: &PgPool, slug: &str) -> ServiceResult<Venue> {
    db::venues::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::VenueNotFound).with_detail("slug", slug).into())
}

pub async fn delete_venue(pool: &PgPool, venue: &Venue) -> ServiceResult<VenueDeleted> {
    let deleted = db::venues::delete_cascade(pool, venue.id).await?;
    tracing::info!(
        venue_id = venue.id,
        slug = %venue.slug,
        orders = deleted.orders_deleted,
        items = deleted.items_deleted,
        "Venue deleted"
    );
    Ok(deleted)
}
