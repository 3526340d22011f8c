//! Database access layer
//!
//! Every venue-scoped query takes the venue id explicitly; callers resolve
//! and authorize the venue first.

pub mod associations;
pub mod items;
pub mod orders;
pub mod recommendations;
pub mod table_tokens;
pub mod venues;
pub mod waiter_calls;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
