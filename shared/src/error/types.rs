//! `AppError` and the JSON error body it renders to

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by every API operation
///
/// `details` carries machine-readable context such as the token check reason
/// or the expected order total.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the default message of `code`
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }
}

/// JSON body of a failed request: `{ code, message, details? }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
        }
        (status, axum::Json(ApiResponse::error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_message_and_details() {
        let err = AppError::new(ErrorCode::TableTokenInvalid)
            .with_detail("reason", "mismatch")
            .with_detail("table_number", 5);

        assert_eq!(err.message, "Table QR code is invalid or expired");
        let details = err.details.unwrap();
        assert_eq!(details["reason"], "mismatch");
        assert_eq!(details["table_number"], 5);
    }

    #[test]
    fn status_follows_code() {
        assert_eq!(
            AppError::new(ErrorCode::OrderNotFound).http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::permission_denied("Not your venue").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::token_expired().http_status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn error_body_shape() {
        let body = ApiResponse::error(&AppError::not_authenticated());
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 1001);
        assert!(json.get("details").is_none());

        let err = AppError::new(ErrorCode::OrderTotalMismatch).with_detail("expected", 12.5);
        let json = serde_json::to_value(ApiResponse::error(&err)).unwrap();
        assert_eq!(json["code"], 4008);
        assert_eq!(json["details"]["expected"], 12.5);
    }
}
