//! Business logic between the HTTP handlers and the database layer

pub mod lifecycle;
pub mod menu;
pub mod ordering;
pub mod pairing;
pub mod recommend;
pub mod token_guard;
pub mod venues;
pub mod waiter_calls;

#[cfg(test)]
mod tests;
