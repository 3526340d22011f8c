//! Order storage and status transitions

use shared::models::{Order, OrderLine, OrderLineInput, OrderStatus};
use sqlx::PgPool;
use std::collections::HashMap;

use super::BoxError;
use super::associations;

/// Order row before lines are attached
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    venue_id: i64,
    table_number: i32,
    total: f64,
    status: String,
    customer_session: String,
    notes: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl OrderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> Result<Order, BoxError> {
        let status = OrderStatus::from_db(&self.status)
            .ok_or_else(|| format!("order {} has unknown status {:?}", self.id, self.status))?;
        Ok(Order {
            id: self.id,
            venue_id: self.venue_id,
            table_number: self.table_number,
            total: self.total,
            status,
            customer_session: self.customer_session,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            lines,
        })
    }
}

const ORDER_COLUMNS: &str = "id, venue_id, table_number, total, status, customer_session, notes, created_at, updated_at";

/// Fields of a validated, server-priced order
pub struct NewOrder<'a> {
    pub venue_id: i64,
    pub table_number: i32,
    pub total: f64,
    pub customer_session: &'a str,
    pub notes: Option<&'a str>,
    pub lines: &'a [OrderLineInput],
}

/// Insert order, lines and add-ons in one transaction; returns the order id
pub async fn insert(pool: &PgPool, order: &NewOrder<'_>, now: i64) -> Result<i64, BoxError> {
    let mut tx = pool.begin().await?;

    let (order_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO orders (
            venue_id, table_number, total, status, customer_session, notes,
            associations_recorded, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $7)
        RETURNING id
        "#,
    )
    .bind(order.venue_id)
    .bind(order.table_number)
    .bind(order.total)
    .bind(OrderStatus::Placed.as_db())
    .bind(order.customer_session)
    .bind(order.notes)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for line in order.lines {
        let (line_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO order_items (order_id, item_id, variant_id, quantity, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(order_id)
        .bind(line.item_id)
        .bind(line.variant_id)
        .bind(line.quantity)
        .bind(&line.notes)
        .fetch_one(&mut *tx)
        .await?;

        if !line.addon_ids.is_empty() {
            sqlx::query(
                "INSERT INTO order_addons (order_item_id, addon_id) SELECT $1, UNNEST($2::BIGINT[])",
            )
            .bind(line_id)
            .bind(&line.addon_ids)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(order_id)
}

/// Move `placed` orders with `stale_cutoff < created_at <= advance_cutoff` to `preparing`
///
/// `venue_id = None` sweeps every venue. Returns the number of advanced orders.
pub async fn advance_placed(
    pool: &PgPool,
    venue_id: Option<i64>,
    advance_cutoff: i64,
    stale_cutoff: i64,
    now: i64,
) -> Result<u64, BoxError> {
    let result = sqlx::query(
        r#"
        UPDATE orders SET status = $1, updated_at = $2
        WHERE status = $3
          AND created_at <= $4
          AND created_at > $5
          AND ($6::BIGINT IS NULL OR venue_id = $6)
        "#,
    )
    .bind(OrderStatus::Preparing.as_db())
    .bind(now)
    .bind(OrderStatus::Placed.as_db())
    .bind(advance_cutoff)
    .bind(stale_cutoff)
    .bind(venue_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Venue orders, newest first
pub async fn list_for_venue(
    pool: &PgPool,
    venue_id: i64,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Order>, BoxError> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
        r#"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE venue_id = $1 AND ($2::TEXT IS NULL OR status = $2)
        ORDER BY created_at DESC, id DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(venue_id)
    .bind(status.map(|s| s.as_db()))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    attach_lines(pool, rows).await
}

/// Orders of one customer session at a venue created since `since`, newest first
pub async fn list_for_session(
    pool: &PgPool,
    venue_id: i64,
    customer_session: &str,
    since: i64,
) -> Result<Vec<Order>, BoxError> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
        r#"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE venue_id = $1 AND customer_session = $2 AND created_at >= $3
        ORDER BY created_at DESC, id DESC
        "#
    ))
    .bind(venue_id)
    .bind(customer_session)
    .bind(since)
    .fetch_all(pool)
    .await?;
    attach_lines(pool, rows).await
}

async fn attach_lines(pool: &PgPool, rows: Vec<OrderRow>) -> Result<Vec<Order>, BoxError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let order_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let lines: Vec<OrderLine> = sqlx::query_as(
        r#"
        SELECT oi.id, oi.order_id, oi.item_id, i.name AS item_name, oi.variant_id,
               oi.quantity, oi.notes,
               COALESCE(
                   array_agg(oa.addon_id ORDER BY oa.id) FILTER (WHERE oa.addon_id IS NOT NULL),
                   '{}'::BIGINT[]
               ) AS addon_ids
        FROM order_items oi
        JOIN items i ON i.id = oi.item_id
        LEFT JOIN order_addons oa ON oa.order_item_id = oi.id
        WHERE oi.order_id = ANY($1)
        GROUP BY oi.id, i.name
        ORDER BY oi.id
        "#,
    )
    .bind(&order_ids)
    .fetch_all(pool)
    .await?;

    let mut by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
    for line in lines {
        by_order.entry(line.order_id).or_default().push(line);
    }

    rows.into_iter()
        .map(|row| {
            let lines = by_order.remove(&row.id).unwrap_or_default();
            row.into_order(lines)
        })
        .collect()
}

pub async fn find_venue_id(pool: &PgPool, order_id: i64) -> Result<Option<i64>, BoxError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT venue_id FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(id,)| id))
}

/// Outcome of an operator status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    /// This update claimed the order and recorded its item associations
    pub associations_recorded: bool,
}

/// Set the status; for completing statuses, record item associations once
///
/// Status change, flag claim and association upserts share one transaction.
/// The conditional claim serializes concurrent completions on the order row.
/// Returns `None` when the order does not exist.
pub async fn update_status(
    pool: &PgPool,
    order_id: i64,
    status: OrderStatus,
    now: i64,
) -> Result<Option<StatusUpdate>, BoxError> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query("UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(status.as_db())
        .bind(now)
        .bind(order_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if updated == 0 {
        return Ok(None);
    }

    let mut associations_recorded = false;
    if status.records_associations() {
        let claimed = sqlx::query(
            "UPDATE orders SET associations_recorded = TRUE WHERE id = $1 AND NOT associations_recorded",
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if claimed == 1 {
            let pairs = associations::record_for_order(&mut *tx, order_id, now).await?;
            tracing::debug!(order_id, pairs, "Item associations recorded");
            associations_recorded = true;
        }
    }

    tx.commit().await?;
    Ok(Some(StatusUpdate {
        associations_recorded,
    }))
}
