//! Public recommendation endpoint

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::Recommendations;

use crate::services::recommend;
use crate::state::AppState;

use super::ApiResult;

/// GET /item/:id/recommendations
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> ApiResult<Recommendations> {
    let settings = state.settings.current();
    let recommendations = recommend::recommend(&state.pool, &settings, item_id).await?;
    Ok(Json(recommendations))
}
