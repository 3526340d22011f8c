//! Order endpoints: place (customer), status override and listing (owner), polling (customer)

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use http::HeaderMap;
use http::header::SET_COOKIE;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderCreate, OrderStatusChanged, OrderStatusUpdate};

use crate::auth::OwnerIdentity;
use crate::auth::session::{session_cookie, session_from_headers};
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::services::{lifecycle, ordering, venues};
use crate::state::AppState;
use crate::util::now_millis;

use super::{ApiResult, verify_venue, verify_venue_id};

/// Customer polling window
const MY_ORDERS_WINDOW_MS: i64 = 24 * 3600 * 1000;

const DEFAULT_PER_PAGE: i64 = 20;
const MAX_PER_PAGE: i64 = 100;
const MAX_PAGE: i64 = 10_000;

/// POST /order
pub async fn place_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<OrderCreate>,
) -> Result<impl IntoResponse, AppError> {
    let session = session_from_headers(&headers);
    let created = ordering::place_order(&state.pool, &payload, session).await?;
    let cookie = session_cookie(&created.customer_session, state.session_cookie_secure);
    Ok(([(SET_COOKIE, cookie)], Json(created)))
}

/// PATCH /order/:id
pub async fn update_status(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(order_id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> ApiResult<OrderStatusChanged> {
    let status = lifecycle::parse_status(&payload.status)?;
    let venue_id = db::orders::find_venue_id(&state.pool, order_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id))?;
    verify_venue_id(&state, venue_id, &identity).await?;

    let changed = lifecycle::set_status(&state.pool, order_id, status).await?;
    Ok(Json(changed))
}

#[derive(Deserialize)]
pub struct OrdersQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
}

impl OrdersQuery {
    /// `(limit, offset)`; pages past `MAX_PAGE` are rejected
    fn window(&self) -> Result<(i64, i64), AppError> {
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        let page = self.page.unwrap_or(1).max(1);
        if page > MAX_PAGE {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("page must be at most {MAX_PAGE}"),
            )
            .with_detail("page", page));
        }
        Ok((per_page, (page - 1) * per_page))
    }
}

/// GET /venue/:slug/orders
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    Path(slug): Path<String>,
    Query(query): Query<OrdersQuery>,
) -> ApiResult<Vec<Order>> {
    let (per_page, offset) = query.window()?;
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(lifecycle::parse_status)
        .transpose()?;
    let venue = verify_venue(&state, &slug, &identity).await?;

    let settings = state.settings.current();
    lifecycle::advance_venue_orders(&state.pool, &settings, venue.id).await?;

    let orders = db::orders::list_for_venue(&state.pool, venue.id, status, per_page, offset)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(orders))
}

/// GET /venue/:slug/my-orders
///
/// Always 200: a missing cookie, unknown venue or failed query yields `[]`.
pub async fn my_orders(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Json<Vec<Order>> {
    let Some(session) = session_from_headers(&headers) else {
        return Json(Vec::new());
    };
    match session_orders(&state, &slug, &session).await {
        Ok(orders) => Json(orders),
        Err(e) => {
            let e: AppError = e.into();
            tracing::warn!(slug = %slug, error = %e, "Customer order polling failed");
            Json(Vec::new())
        }
    }
}

async fn session_orders(state: &AppState, slug: &str, session: &str) -> ServiceResult<Vec<Order>> {
    let venue = venues::find_venue(&state.pool, slug).await?;
    let settings = state.settings.current();
    lifecycle::advance_venue_orders(&state.pool, &settings, venue.id).await?;
    let since = now_millis() - MY_ORDERS_WINDOW_MS;
    Ok(db::orders::list_for_session(&state.pool, venue.id, session, since).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<i64>, per_page: Option<i64>) -> OrdersQuery {
        OrdersQuery {
            page,
            per_page,
            status: None,
        }
    }

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(query(None, None).window().unwrap(), (20, 0));
        assert_eq!(query(Some(3), Some(10)).window().unwrap(), (10, 20));
        assert_eq!(query(Some(0), Some(0)).window().unwrap(), (1, 0));
        assert_eq!(query(Some(-5), Some(500)).window().unwrap(), (100, 0));
        assert_eq!(
            query(Some(MAX_PAGE), Some(100)).window().unwrap(),
            (100, (MAX_PAGE - 1) * 100)
        );
    }

    #[test]
    fn huge_page_is_rejected() {
        for page in [MAX_PAGE + 1, i64::MAX] {
            let err = query(Some(page), Some(100)).window().unwrap_err();
            assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        }
    }
}
