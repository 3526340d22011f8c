//! Order ingestion
//!
//! Checks run in a fixed order: venue, table token, cart shape, menu
//! membership, then the client total against a server-side reprice. The order
//! is stored only when all of them pass.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{OrderCreate, OrderCreated, OrderLineInput};
use shared::money::{line_total, money_eq, to_f64};
use sqlx::PgPool;
use std::collections::HashMap;

use crate::db;
use crate::db::items::CartCatalog;
use crate::error::ServiceResult;
use crate::services::{token_guard, venues};
use crate::util::{generate_session_id, now_millis};

/// Largest quantity accepted on one line
pub const MAX_QUANTITY: i32 = 99;

/// Shape checks that need no database
pub fn validate_cart(lines: &[OrderLineInput]) -> Result<(), AppError> {
    if lines.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    for line in lines {
        if !(1..=MAX_QUANTITY).contains(&line.quantity) {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("quantity must be between 1 and {MAX_QUANTITY}"),
            )
            .with_detail("item_id", line.item_id)
            .with_detail("quantity", line.quantity));
        }
    }
    Ok(())
}

/// Server-side cart total from menu prices
///
/// A variant price replaces the item price; add-on prices are added per unit.
/// Items outside the venue, unavailable items and foreign variants or add-ons
/// are rejected.
pub fn price_cart(catalog: &CartCatalog, lines: &[OrderLineInput]) -> Result<Decimal, AppError> {
    let items: HashMap<i64, _> = catalog.items.iter().map(|i| (i.id, i)).collect();
    let variants: HashMap<i64, _> = catalog.variants.iter().map(|v| (v.id, v)).collect();
    let addons: HashMap<i64, _> = catalog.addons.iter().map(|a| (a.id, a)).collect();

    let mut total = Decimal::ZERO;
    for line in lines {
        let item = items.get(&line.item_id).ok_or_else(|| {
            AppError::new(ErrorCode::ItemNotFound).with_detail("item_id", line.item_id)
        })?;
        if !item.is_available {
            return Err(AppError::new(ErrorCode::ItemUnavailable)
                .with_detail("item_id", item.id)
                .with_detail("name", item.name.clone()));
        }

        let unit_price = match line.variant_id {
            Some(variant_id) => match variants.get(&variant_id) {
                Some(v) if v.item_id == item.id => v.price,
                _ => {
                    return Err(AppError::new(ErrorCode::VariantNotFound)
                        .with_detail("item_id", item.id)
                        .with_detail("variant_id", variant_id));
                }
            },
            None => item.price,
        };

        let mut addon_prices = Vec::with_capacity(line.addon_ids.len());
        for addon_id in &line.addon_ids {
            match addons.get(addon_id) {
                Some(a) if a.item_id == item.id => addon_prices.push(a.price),
                _ => {
                    return Err(AppError::new(ErrorCode::AddonNotFound)
                        .with_detail("item_id", item.id)
                        .with_detail("addon_id", *addon_id));
                }
            }
        }

        total += line_total(unit_price, &addon_prices, line.quantity);
    }
    Ok(total)
}

/// Human-readable preparation estimate from the total quantity
pub fn eta_for(lines: &[OrderLineInput]) -> String {
    let quantity: i64 = lines.iter().map(|l| i64::from(l.quantity.max(0))).sum();
    let low = 10 + 2 * quantity.min(10);
    let high = low + 5;
    format!("{low}-{high} minutes")
}

/// Keep a well-formed session id from the cookie; mint a fresh one otherwise
pub fn resolve_session(session: Option<&str>) -> String {
    session
        .and_then(|s| uuid::Uuid::parse_str(s).ok())
        .map(|id| id.to_string())
        .unwrap_or_else(generate_session_id)
}

/// Validate, price and store a customer order
///
/// `session` is the caller's existing `customer_session`, if any.
pub async fn place_order(
    pool: &PgPool,
    payload: &OrderCreate,
    session: Option<String>,
) -> ServiceResult<OrderCreated> {
    let venue = venues::find_venue(pool, &payload.venue_slug).await?;

    token_guard::require_valid(
        pool,
        venue.id,
        payload.table_number,
        payload.table_token.as_deref(),
    )
    .await?;

    validate_cart(&payload.items)?;

    let mut item_ids: Vec<i64> = payload.items.iter().map(|l| l.item_id).collect();
    item_ids.sort_unstable();
    item_ids.dedup();
    let catalog = db::items::cart_catalog(pool, venue.id, &item_ids).await?;

    let total = to_f64(price_cart(&catalog, &payload.items)?);
    if !money_eq(payload.total, total) {
        return Err(AppError::new(ErrorCode::OrderTotalMismatch)
            .with_detail("expected", total)
            .with_detail("received", payload.total)
            .into());
    }

    let customer_session = resolve_session(session.as_deref());
    let order_id = db::orders::insert(
        pool,
        &db::orders::NewOrder {
            venue_id: venue.id,
            table_number: payload.table_number,
            total,
            customer_session: &customer_session,
            notes: payload.notes.as_deref(),
            lines: &payload.items,
        },
        now_millis(),
    )
    .await?;

    tracing::info!(
        order_id,
        venue_id = venue.id,
        table_number = payload.table_number,
        total,
        lines = payload.items.len(),
        "Order placed"
    );

    Ok(OrderCreated {
        order_id,
        eta: eta_for(&payload.items),
        customer_session,
        total,
    })
}
