//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::VenueNotFound
            | Self::OrderNotFound
            | Self::ItemNotFound
            | Self::CategoryNotFound
            | Self::VariantNotFound
            | Self::AddonNotFound
            | Self::TableTokenNotFound
            | Self::WaiterCallNotFound => StatusCode::NOT_FOUND,

            // Owner JWT and table QR token alike
            Self::NotAuthenticated
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::TableTokenRequired
            | Self::TableTokenInvalid => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,

            Self::DatabaseError | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            // Validation and business rule failures
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
