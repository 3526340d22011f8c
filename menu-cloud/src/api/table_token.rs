//! Table token management (owner)

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::models::{TableToken, TableTokenIssue};

use crate::auth::OwnerIdentity;
use crate::services::token_guard;
use crate::state::AppState;

use super::{ApiResult, verify_venue};

/// GET /venue/:slug/table-tokens
pub async fn list_tokens(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(slug): Path<String>,
) -> ApiResult<Vec<TableToken>> {
    let venue = verify_venue(&state, &slug, &identity).await?;
    Ok(Json(token_guard::list(&state.pool, venue.id).await?))
}

/// POST /venue/:slug/table-tokens
pub async fn issue_token(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(slug): Path<String>,
    Json(payload): Json<TableTokenIssue>,
) -> ApiResult<TableToken> {
    let venue = verify_venue(&state, &slug, &identity).await?;
    let token = token_guard::issue(&state.pool, venue.id, payload.table_number).await?;
    Ok(Json(token))
}

/// POST /venue/:slug/table-tokens/:id/revoke
pub async fn revoke_token(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path((slug, token_id)): Path<(String, i64)>,
) -> ApiResult<TableToken> {
    let venue = verify_venue(&state, &slug, &identity).await?;
    let token = token_guard::revoke(&state.pool, venue.id, token_id).await?;
    Ok(Json(token))
}
