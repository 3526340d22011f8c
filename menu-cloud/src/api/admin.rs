//! Admin endpoints: runtime settings

use axum::{Extension, Json, extract::State};
use shared::error::{AppError, ErrorCode};

use crate::auth::OwnerIdentity;
use crate::settings::RuntimeSettings;
use crate::state::AppState;

use super::{ApiResult, require_admin};

/// GET /admin/settings
pub async fn get_settings(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
) -> ApiResult<RuntimeSettings> {
    require_admin(&identity)?;
    Ok(Json(state.settings.current().as_ref().clone()))
}

/// POST /admin/settings/reload
pub async fn reload_settings(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
) -> ApiResult<RuntimeSettings> {
    require_admin(&identity)?;
    let settings = state.settings.reload_from_env().map_err(|e| {
        tracing::warn!(error = %e, user_id = identity.user_id, "Settings reload rejected");
        AppError::with_message(ErrorCode::ConfigError, e.to_string())
    })?;
    Ok(Json(settings.as_ref().clone()))
}
