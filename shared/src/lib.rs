//! Shared types for the QR menu platform
//!
//! Common types used by the server and its clients: error types,
//! API response structures, domain models and money helpers.

pub mod error;
pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
