//! Recommendation assembly
//!
//! Three independent sources, each capped by its own runtime limit and not
//! deduplicated against each other.

use shared::error::{AppError, ErrorCode};
use shared::models::Recommendations;
use shared::money::PriceBand;
use sqlx::PgPool;

use crate::db;
use crate::error::ServiceResult;
use crate::settings::RuntimeSettings;

pub async fn recommend(
    pool: &PgPool,
    settings: &RuntimeSettings,
    item_id: i64,
) -> ServiceResult<Recommendations> {
    let item = db::items::find(pool, item_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ItemNotFound).with_detail("item_id", item_id))?;

    let (frequently_bought_together, ai_pairings, similar_items) = tokio::try_join!(
        db::recommendations::frequently_bought_together(pool, item.id, settings.fbt_limit),
        db::recommendations::ai_pairings(pool, item.id, settings.pairing_limit),
        db::recommendations::similar_items(
            pool,
            item.id,
            item.category_id,
            PriceBand::around(item.price),
            settings.similar_limit,
        ),
    )?;

    Ok(Recommendations {
        item_id: item.id,
        frequently_bought_together,
        ai_pairings,
        similar_items,
    })
}
