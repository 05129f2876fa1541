//! Checkout
//!
//! Orchestrates the payment-method discount flow for a cart: selection writes from the
//! storefront, recalculation of the discount fee line and the summary of discounts on
//! offer.

pub mod errors;
pub mod models;
pub mod service;

pub use errors::CheckoutServiceError;
pub use service::*;
