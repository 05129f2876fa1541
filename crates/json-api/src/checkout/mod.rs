//! Checkout
//!
//! Storefront-facing endpoints for the payment method discount. None of them require an
//! API token; the selection notification is guarded by a nonce bound to the cart.

pub(crate) mod errors;
mod handlers;
pub(crate) mod models;

pub(crate) use handlers::*;
