//! Menu item creation (owner)

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::models::{ItemCreate, ItemCreated};

use crate::auth::OwnerIdentity;
use crate::services::menu;
use crate::state::AppState;

use super::{ApiResult, verify_venue};

/// POST /venue/:slug/items
pub async fn create_item(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(slug): Path<String>,
    Json(payload): Json<ItemCreate>,
) -> ApiResult<ItemCreated> {
    let venue = verify_venue(&state, &slug, &identity).await?;
    let created = menu::create_item(&state, venue.id, &payload).await?;
    Ok(Json(created))
}
