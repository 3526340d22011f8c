use super::*;
use crate::services::{lifecycle, ordering, recommend};
use crate::settings::RuntimeSettings;
use shared::models::{OrderStatus, RecommendedItem};

async fn complete(pool: &PgPool, item_ids: &[i64], total: f64) {
    let created = ordering::place_order(pool, &table_order(item_ids, total), None)
        .await
        .unwrap();
    lifecycle::set_status(pool, created.order_id, OrderStatus::Completed)
        .await
        .unwrap();
}

async fn pair(pool: &PgPool, item_id: i64, partner_id: i64, reason: &str, display_order: i32) {
    sqlx::query(
        "INSERT INTO item_pairings (item_id, pairing_item_id, reason, display_order) VALUES ($1, $2, $3, $4)",
    )
    .bind(item_id)
    .bind(partner_id)
    .bind(reason)
    .bind(display_order)
    .execute(pool)
    .await
    .unwrap();
}

fn ids(items: &[RecommendedItem]) -> Vec<i64> {
    items.iter().map(|i| i.id).collect()
}

#[tokio::test]
async fn frequently_bought_together_skips_unavailable_partner() {
    let Some(db) = TestDb::start().await else {
        return;
    };
    let cafe = seed_cafe(&db.pool).await;
    let settings = RuntimeSettings::default();

    complete(&db.pool, &[cafe.latte, cafe.croissant, cafe.muffin], 10.70).await;
    complete(&db.pool, &[cafe.latte, cafe.croissant, cafe.muffin], 10.70).await;
    complete(&db.pool, &[cafe.latte, cafe.cookie], 7.00).await;

    // Ties on count break by partner id
    let recs = recommend::recommend(&db.pool, &settings, cafe.latte).await.unwrap();
    assert_eq!(recs.item_id, cafe.latte);
    assert_eq!(
        ids(&recs.frequently_bought_together),
        vec![cafe.croissant, cafe.muffin, cafe.cookie]
    );

    set_available(&db.pool, cafe.croissant, false).await;
    let recs = recommend::recommend(&db.pool, &settings, cafe.latte).await.unwrap();
    assert_eq!(
        ids(&recs.frequently_bought_together),
        vec![cafe.muffin, cafe.cookie]
    );

    let narrow = RuntimeSettings {
        fbt_limit: 1,
        ..RuntimeSettings::default()
    };
    let recs = recommend::recommend(&db.pool, &narrow, cafe.latte).await.unwrap();
    assert_eq!(ids(&recs.frequently_bought_together), vec![cafe.muffin]);
}

#[tokio::test]
async fn pairings_follow_display_order_and_skip_unavailable() {
    let Some(db) = TestDb::start().await else {
        return;
    };
    let cafe = seed_cafe(&db.pool).await;

    pair(&db.pool, cafe.latte, cafe.croissant, "Buttery with milky coffee", 0).await;
    pair(&db.pool, cafe.latte, cafe.cookie, "Something sweet", 1).await;
    pair(&db.pool, cafe.latte, cafe.muffin, "Classic breakfast", 2).await;

    let recs = recommend::recommend(&db.pool, &RuntimeSettings::default(), cafe.latte)
        .await
        .unwrap();
    assert_eq!(
        ids(&recs.ai_pairings),
        vec![cafe.croissant, cafe.cookie, cafe.muffin]
    );
    assert_eq!(
        recs.ai_pairings[0].reason.as_deref(),
        Some("Buttery with milky coffee")
    );
    assert!(recs.frequently_bought_together.is_empty());

    set_available(&db.pool, cafe.croissant, false).await;
    let recs = recommend::recommend(&db.pool, &RuntimeSettings::default(), cafe.latte)
        .await
        .unwrap();
    assert_eq!(ids(&recs.ai_pairings), vec![cafe.cookie, cafe.muffin]);
}

#[tokio::test]
async fn similar_items_stay_strictly_inside_the_price_band() {
    let Some(db) = TestDb::start().await else {
        return;
    };
    let cafe = seed_cafe(&db.pool).await;

    // Latte at 4.50 gives the open band (3.15, 5.85)
    let flat_white = add_item(&db.pool, cafe.category_id, "Flat White", 5.00).await;
    add_item(&db.pool, cafe.category_id, "Mocha", 5.85).await;
    add_item(&db.pool, cafe.category_id, "Chai", 3.15).await;
    set_available(&db.pool, cafe.croissant, false).await;

    let recs = recommend::recommend(&db.pool, &RuntimeSettings::default(), cafe.latte)
        .await
        .unwrap();
    assert_eq!(ids(&recs.similar_items), vec![flat_white]);

    set_available(&db.pool, cafe.croissant, true).await;
    let recs = recommend::recommend(&db.pool, &RuntimeSettings::default(), cafe.latte)
        .await
        .unwrap();
    let mut similar = ids(&recs.similar_items);
    similar.sort_unstable();
    assert_eq!(similar, vec![cafe.croissant, flat_white]);

    assert_eq!(
        code(
            recommend::recommend(&db.pool, &RuntimeSettings::default(), 999_999)
                .await
                .unwrap_err()
        ),
        ErrorCode::ItemNotFound
    );
}
