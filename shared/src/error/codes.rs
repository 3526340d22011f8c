//! Unified error codes for the menu platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors (including table tokens)
//! - 2xxx: Permission errors
//! - 3xxx: Venue errors
//! - 4xxx: Order errors
//! - 6xxx: Item errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the dashboard and the
/// customer menu can switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Too many requests from this client
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Order or waiter call attempted without scanning the table QR code
    TableTokenRequired = 1101,
    /// Table token unknown, revoked or for another table
    TableTokenInvalid = 1102,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Venue ====================
    /// Venue not found
    VenueNotFound = 3001,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order is empty
    OrderEmpty = 4007,
    /// Client-submitted total does not match server-side pricing
    OrderTotalMismatch = 4008,
    /// Unknown order status value
    OrderStatusInvalid = 4009,

    // ==================== 6xxx: Item ====================
    /// Item not found
    ItemNotFound = 6001,
    /// Item has invalid price
    ItemInvalidPrice = 6002,
    /// Item is currently unavailable
    ItemUnavailable = 6003,
    /// Category not found
    CategoryNotFound = 6101,
    /// Variant not found
    VariantNotFound = 6201,
    /// Add-on not found
    AddonNotFound = 6301,

    // ==================== 7xxx: Table ====================
    /// Table token not found
    TableTokenNotFound = 7001,
    /// Waiter call not found
    WaiterCallNotFound = 7201,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::TableTokenRequired => "Scan the table QR code to continue",
            ErrorCode::TableTokenInvalid => "Table QR code is invalid or expired",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Venue
            ErrorCode::VenueNotFound => "Venue not found",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::OrderTotalMismatch => "Order total does not match menu prices",
            ErrorCode::OrderStatusInvalid => "Unknown order status",

            // Item
            ErrorCode::ItemNotFound => "Item not found",
            ErrorCode::ItemInvalidPrice => "Item has invalid price",
            ErrorCode::ItemUnavailable => "Item is currently unavailable",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::VariantNotFound => "Variant not found",
            ErrorCode::AddonNotFound => "Add-on not found",

            // Table
            ErrorCode::TableTokenNotFound => "Table token not found",
            ErrorCode::WaiterCallNotFound => "Waiter call not found",

            // System
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1101 => Ok(ErrorCode::TableTokenRequired),
            1102 => Ok(ErrorCode::TableTokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // Venue
            3001 => Ok(ErrorCode::VenueNotFound),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::OrderTotalMismatch),
            4009 => Ok(ErrorCode::OrderStatusInvalid),

            // Item
            6001 => Ok(ErrorCode::ItemNotFound),
            6002 => Ok(ErrorCode::ItemInvalidPrice),
            6003 => Ok(ErrorCode::ItemUnavailable),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6201 => Ok(ErrorCode::VariantNotFound),
            6301 => Ok(ErrorCode::AddonNotFound),

            // Table
            7001 => Ok(ErrorCode::TableTokenNotFound),
            7201 => Ok(ErrorCode::WaiterCallNotFound),

            // System
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
