//! Menu item creation

use shared::error::{AppError, ErrorCode};
use shared::models::{ItemCreate, ItemCreated};

use crate::db;
use crate::error::ServiceResult;
use crate::services::pairing;
use crate::state::AppState;
use crate::util::now_millis;

fn validate_item(data: &ItemCreate) -> Result<(), AppError> {
    if data.name.trim().is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "name is required")
            .with_detail("field", "name"));
    }
    if !data.price.is_finite() || data.price < 0.0 {
        return Err(AppError::new(ErrorCode::ItemInvalidPrice).with_detail("price", data.price));
    }
    Ok(())
}

/// Create an item in one of the venue's categories, then try to pair it
///
/// Pairing enrichment runs once, only when a suggester is configured, and
/// never fails the creation.
pub async fn create_item(
    state: &AppState,
    venue_id: i64,
    data: &ItemCreate,
) -> ServiceResult<ItemCreated> {
    validate_item(data)?;
    if !db::items::category_in_venue(&state.pool, venue_id, data.category_id).await? {
        return Err(AppError::new(ErrorCode::CategoryNotFound)
            .with_detail("category_id", data.category_id)
            .into());
    }

    let item = db::items::create(&state.pool, data, now_millis()).await?;
    tracing::info!(item_id = item.id, venue_id, name = %item.name, "Item created");

    let pairings_created = match &state.suggester {
        Some(suggester) => {
            pairing::enrich_item(&state.pool, suggester, state.matcher.as_ref(), venue_id, &item)
                .await
        }
        None => 0,
    };

    Ok(ItemCreated {
        item,
        pairings_created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, price: f64) -> ItemCreate {
        ItemCreate {
            category_id: 1,
            name: name.into(),
            description: None,
            price,
            calories: None,
            allergens: None,
            tags: vec![],
            image_url: None,
        }
    }

    #[test]
    fn item_validation() {
        assert!(validate_item(&payload("Tiramisu", 6.5)).is_ok());
        assert!(validate_item(&payload("Water", 0.0)).is_ok());
        assert_eq!(
            validate_item(&payload(" ", 6.5)).unwrap_err().code,
            ErrorCode::RequiredField
        );
        assert_eq!(
            validate_item(&payload("Tiramisu", -1.0)).unwrap_err().code,
            ErrorCode::ItemInvalidPrice
        );
        assert_eq!(
            validate_item(&payload("Tiramisu", f64::NAN)).unwrap_err().code,
            ErrorCode::ItemInvalidPrice
        );
    }
}
