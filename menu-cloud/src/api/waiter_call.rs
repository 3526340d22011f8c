//! Waiter call endpoints: create (customer), list and resolve (owner)

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::models::{WaiterCall, WaiterCallCreate, WaiterCallCreated};

use crate::auth::OwnerIdentity;
use crate::services::waiter_calls;
use crate::state::AppState;

use super::{ApiResult, verify_venue};

/// POST /waiter-call
pub async fn call_waiter(
    State(state): State<AppState>,
    Json(payload): Json<WaiterCallCreate>,
) -> ApiResult<WaiterCallCreated> {
    Ok(Json(waiter_calls::call_waiter(&state.pool, &payload).await?))
}

/// GET /venue/:slug/waiter-calls
pub async fn list_pending(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(slug): Path<String>,
) -> ApiResult<Vec<WaiterCall>> {
    let venue = verify_venue(&state, &slug, &identity).await?;
    Ok(Json(waiter_calls::list_pending(&state.pool, venue.id).await?))
}

/// POST /venue/:slug/waiter-calls/:id/resolve
pub async fn resolve(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path((slug, call_id)): Path<(String, i64)>,
) -> ApiResult<WaiterCall> {
    let venue = verify_venue(&state, &slug, &identity).await?;
    Ok(Json(waiter_calls::resolve(&state.pool, venue.id, call_id).await?))
}
