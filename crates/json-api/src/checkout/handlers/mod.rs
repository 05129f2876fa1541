//! Checkout Handlers

pub(crate) mod discounts;
pub(crate) mod nonce;
pub(crate) mod payment_method;
pub(crate) mod process;
pub(crate) mod recalculate;
pub(crate) mod update_order_review;
