//! Owner JWT authentication for the venue management API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use crate::state::AppState;

const ROLE_ADMIN: &str = "admin";

/// JWT claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerClaims {
    /// User ID
    pub sub: String,
    pub email: String,
    /// `admin` for platform administrators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated caller extracted from the JWT
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct OwnerIdentity {
    pub user_id: i64,
    pub email: String,
    pub is_admin: bool,
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT for a user (tooling and tests; issuance lives in the identity provider)
#[allow(dead_code)]
pub fn create_token(
    user_id: i64,
    email: &str,
    is_admin: bool,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = OwnerClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: is_admin.then(|| ROLE_ADMIN.to_string()),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and verify a bearer token into an identity
pub fn verify_token(token: &str, secret: &str) -> Result<OwnerIdentity, AppError> {
    let token_data = jsonwebtoken::decode::<OwnerClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid or expired token"),
        }
    })?;

    let claims = token_data.claims;
    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::invalid_token("Invalid subject claim"))?;

    Ok(OwnerIdentity {
        user_id,
        email: claims.email,
        is_admin: claims.role.as_deref() == Some(ROLE_ADMIN),
    })
}

/// Middleware that extracts and verifies the owner JWT from the Authorization header
pub async fn owner_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format").into_response())?;

    let identity = verify_token(token, &state.jwt_secret).map_err(IntoResponse::into_response)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
