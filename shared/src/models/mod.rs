//! Data models
//!
//! Shared between menu-cloud and its clients (owner dashboard, customer menu).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL), all timestamps Unix millis.

pub mod menu;
pub mod order;
pub mod recommendation;
pub mod table_token;
pub mod venue;
pub mod waiter_call;

// Re-exports
pub use menu::*;
pub use order::*;
pub use recommendation::*;
pub use table_token::*;
pub use venue::*;
pub use waiter_call::*;
