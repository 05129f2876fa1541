//! Storage, sessions and checkout orchestration for payment-method discounts.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod secrets;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
