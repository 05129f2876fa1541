//! Tender Domain Concerns

pub mod carts;
pub mod checkout;
pub mod gateways;
pub mod nonces;
pub mod sessions;
pub mod settings;

pub(crate) mod errors;
