//! Venue endpoints: summary and cascade delete

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::models::{Venue, VenueDeleted};

use crate::auth::OwnerIdentity;
use crate::services::venues;
use crate::state::AppState;

use super::{ApiResult, verify_venue};

/// GET /venue/:slug
pub async fn get_venue(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(slug): Path<String>,
) -> ApiResult<Venue> {
    let venue = verify_venue(&state, &slug, &identity).await?;
    Ok(Json(venue))
}

/// DELETE /venue/:slug
pub async fn delete_venue(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(slug): Path<String>,
) -> ApiResult<VenueDeleted> {
    let venue = verify_venue(&state, &slug, &identity).await?;
    let deleted = venues::delete_venue(&state.pool, &venue).await?;
    Ok(Json(deleted))
}
