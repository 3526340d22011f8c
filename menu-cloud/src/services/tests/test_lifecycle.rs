use super::*;
use crate::services::{lifecycle, ordering};
use crate::settings::RuntimeSettings;
use shared::models::OrderStatus;

async fn place(pool: &PgPool, item_ids: &[i64], total: f64) -> i64 {
    ordering::place_order(pool, &table_order(item_ids, total), None)
        .await
        .unwrap()
        .order_id
}

#[tokio::test]
async fn lazy_advance_moves_only_eligible_placed_orders() {
    let Some(db) = TestDb::start().await else {
        return;
    };
    let cafe = seed_cafe(&db.pool).await;
    let settings = RuntimeSettings::default();

    let fresh = place(&db.pool, &[cafe.latte], 4.50).await;
    let waiting = place(&db.pool, &[cafe.latte], 4.50).await;
    let stale = place(&db.pool, &[cafe.latte], 4.50).await;
    let delivered = place(&db.pool, &[cafe.latte], 4.50).await;

    lifecycle::set_status(&db.pool, delivered, OrderStatus::Delivered)
        .await
        .unwrap();
    backdate_order(&db.pool, waiting, 31 * SEC).await;
    backdate_order(&db.pool, stale, 25 * HOUR).await;
    backdate_order(&db.pool, delivered, 31 * SEC).await;

    let advanced = lifecycle::advance_venue_orders(&db.pool, &settings, cafe.venue_id)
        .await
        .unwrap();
    assert_eq!(advanced, 1);
    assert_eq!(order_status(&db.pool, fresh).await, "placed");
    assert_eq!(order_status(&db.pool, waiting).await, "preparing");
    assert_eq!(order_status(&db.pool, stale).await, "placed");
    assert_eq!(order_status(&db.pool, delivered).await, "delivered");

    // Repeating the read changes nothing
    let advanced = lifecycle::advance_venue_orders(&db.pool, &settings, cafe.venue_id)
        .await
        .unwrap();
    assert_eq!(advanced, 0);
    assert_eq!(order_status(&db.pool, waiting).await, "preparing");
    assert_eq!(order_status(&db.pool, stale).await, "placed");
}

#[tokio::test]
async fn completion_counts_associations_once_per_order() {
    let Some(db) = TestDb::start().await else {
        return;
    };
    let cafe = seed_cafe(&db.pool).await;
    let cart = [cafe.latte, cafe.croissant, cafe.muffin];

    let first = place(&db.pool, &cart, 10.70).await;
    let second = place(&db.pool, &cart, 10.70).await;

    let changed = lifecycle::set_status(&db.pool, first, OrderStatus::Delivered)
        .await
        .unwrap();
    assert!(changed.associations_recorded);
    assert_eq!(
        associations(&db.pool).await,
        vec![
            (cafe.latte, cafe.croissant, 1),
            (cafe.latte, cafe.muffin, 1),
            (cafe.croissant, cafe.muffin, 1),
        ]
    );

    // Completing after delivery, twice, adds nothing
    for _ in 0..2 {
        let changed = lifecycle::set_status(&db.pool, first, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(changed.status, OrderStatus::Completed);
        assert!(!changed.associations_recorded);
    }

    let changed = lifecycle::set_status(&db.pool, second, OrderStatus::Completed)
        .await
        .unwrap();
    assert!(changed.associations_recorded);
    assert_eq!(
        associations(&db.pool).await,
        vec![
            (cafe.latte, cafe.croissant, 2),
            (cafe.latte, cafe.muffin, 2),
            (cafe.croissant, cafe.muffin, 2),
        ]
    );

    // Moving back and forth does not count the order again
    lifecycle::set_status(&db.pool, second, OrderStatus::Preparing)
        .await
        .unwrap();
    let changed = lifecycle::set_status(&db.pool, second, OrderStatus::Delivered)
        .await
        .unwrap();
    assert!(!changed.associations_recorded);
    assert_eq!(associations(&db.pool).await[0].2, 2);

    assert_eq!(
        code(
            lifecycle::set_status(&db.pool, 999_999, OrderStatus::Completed)
                .await
                .unwrap_err()
        ),
        ErrorCode::OrderNotFound
    );
}

#[tokio::test]
async fn repeated_item_counts_a_pair_once() {
    let Some(db) = TestDb::start().await else {
        return;
    };
    let cafe = seed_cafe(&db.pool).await;

    let order = place(&db.pool, &[cafe.muffin, cafe.muffin, cafe.cookie], 8.50).await;
    lifecycle::set_status(&db.pool, order, OrderStatus::Completed)
        .await
        .unwrap();
    assert_eq!(
        associations(&db.pool).await,
        vec![(cafe.muffin, cafe.cookie, 1)]
    );

    // A single-item order has no pair to record
    let single = place(&db.pool, &[cafe.latte], 4.50).await;
    lifecycle::set_status(&db.pool, single, OrderStatus::Completed)
        .await
        .unwrap();
    assert_eq!(associations(&db.pool).await.len(), 1);
}
