//! Carts

pub(crate) mod errors;
pub(crate) mod fees;
mod handlers;
pub(crate) mod models;

pub(crate) use handlers::*;
