//! Discount Settings
//!
//! Administrator form over the enabled flag and the per-method rules. Both handlers sit
//! behind the bearer token middleware and writes also need a settings nonce.

pub(crate) mod errors;
mod handlers;
pub(crate) mod models;

pub(crate) use handlers::*;
