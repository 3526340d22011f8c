//! Authentication: owner JWTs, customer sessions and rate limiting

pub mod owner_auth;
pub mod rate_limit;
pub mod session;

pub use owner_auth::OwnerIdentity;
