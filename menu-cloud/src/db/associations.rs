//! Item co-occurrence counts ("frequently bought together")

use sqlx::PgConnection;

use super::BoxError;

/// Every unordered pair of distinct ids, lower id first
///
/// Duplicates in the input collapse; an item never pairs with itself.
pub fn association_pairs(item_ids: &[i64]) -> Vec<(i64, i64)> {
    let mut ids = item_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let mut pairs = Vec::with_capacity(ids.len() * ids.len().saturating_sub(1) / 2);
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            pairs.push((*a, *b));
        }
    }
    pairs
}

/// Increment the co-occurrence count of every item pair in the order
///
/// Runs on the caller's connection so it shares the transaction that claims
/// the order's `associations_recorded` flag. Returns the number of pairs.
pub async fn record_for_order(
    conn: &mut PgConnection,
    order_id: i64,
    now: i64,
) -> Result<usize, BoxError> {
    let item_ids: Vec<(i64,)> =
        sqlx::query_as("SELECT DISTINCT item_id FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .fetch_all(&mut *conn)
            .await?;
    let item_ids: Vec<i64> = item_ids.into_iter().map(|(id,)| id).collect();

    let pairs = association_pairs(&item_ids);
    if pairs.is_empty() {
        return Ok(0);
    }
    let (a_ids, b_ids): (Vec<i64>, Vec<i64>) = pairs.iter().copied().unzip();

    sqlx::query(
        r#"
        INSERT INTO item_associations (item_a_id, item_b_id, co_count, last_seen)
        SELECT a, b, 1, $3 FROM UNNEST($1::BIGINT[], $2::BIGINT[]) AS p(a, b)
        ON CONFLICT (item_a_id, item_b_id)
        DO UPDATE SET co_count = item_associations.co_count + 1, last_seen = EXCLUDED.last_seen
        "#,
    )
    .bind(&a_ids)
    .bind(&b_ids)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(pairs.len())
}
