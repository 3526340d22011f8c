//! API routes for menu-cloud

pub mod admin;
pub mod health;
pub mod item;
pub mod order;
pub mod recommendation;
pub mod table_token;
pub mod venue;
pub mod waiter_call;

use axum::routing::{get, patch, post};
use axum::{Router, middleware};
use http::{HeaderName, HeaderValue};
use shared::error::{AppError, ErrorCode};
use shared::models::Venue;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;

use crate::auth::OwnerIdentity;
use crate::auth::owner_auth::owner_auth_middleware;
use crate::auth::rate_limit::{order_rate_limit, waiter_call_rate_limit};
use crate::db;
use crate::error::ServiceError;
use crate::services::venues;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Resolve a venue the caller may manage: owners their own, admins any
///
/// Unknown slug is 404; a venue owned by someone else is 403.
pub async fn verify_venue(
    state: &AppState,
    slug: &str,
    identity: &OwnerIdentity,
) -> Result<Venue, AppError> {
    let venue = venues::find_venue(&state.pool, slug).await?;
    ensure_owner(venue.owner_id, identity)?;
    Ok(venue)
}

/// Same check for a venue known by id
pub async fn verify_venue_id(
    state: &AppState,
    venue_id: i64,
    identity: &OwnerIdentity,
) -> Result<(), AppError> {
    let owner_id = db::venues::find_owner(&state.pool, venue_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::VenueNotFound))?;
    ensure_owner(owner_id, identity)
}

fn ensure_owner(owner_id: i64, identity: &OwnerIdentity) -> Result<(), AppError> {
    if identity.is_admin || identity.user_id == owner_id {
        return Ok(());
    }
    tracing::info!(user_id = identity.user_id, "Venue access denied");
    Err(AppError::permission_denied("Venue belongs to another owner"))
}

pub fn require_admin(identity: &OwnerIdentity) -> Result<(), AppError> {
    if identity.is_admin {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::AdminRequired))
    }
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Customer actions gated by a table token (rate limited per client IP)
    let ordering = Router::new()
        .route("/order", post(order::place_order))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            order_rate_limit,
        ));
    let waiter = Router::new()
        .route("/waiter-call", post(waiter_call::call_waiter))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            waiter_call_rate_limit,
        ));

    // Public reads
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/item/{id}/recommendations",
            get(recommendation::get_recommendations),
        )
        .route("/venue/{slug}/my-orders", get(order::my_orders));

    // Owner / admin management (JWT)
    let owner = Router::new()
        .route("/order/{id}", patch(order::update_status))
        .route(
            "/venue/{slug}",
            get(venue::get_venue).delete(venue::delete_venue),
        )
        .route("/venue/{slug}/orders", get(order::list_orders))
        .route(
            "/venue/{slug}/table-tokens",
            get(table_token::list_tokens).post(table_token::issue_token),
        )
        .route(
            "/venue/{slug}/table-tokens/{id}/revoke",
            post(table_token::revoke_token),
        )
        .route(
            "/venue/{slug}/waiter-calls",
            get(waiter_call::list_pending),
        )
        .route(
            "/venue/{slug}/waiter-calls/{id}/resolve",
            post(waiter_call::resolve),
        )
        .route("/venue/{slug}/items", post(item::create_item))
        .route("/admin/settings", get(admin::get_settings))
        .route("/admin/settings/reload", post(admin::reload_settings))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            owner_auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(ordering)
        .merge(waiter)
        .merge(owner)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Propagate sits inside SetRequestId so it sees the generated id
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .with_state(state)
}
