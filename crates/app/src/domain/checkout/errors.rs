//! Checkout service errors.

use tender::discounts::DiscountError;
use thiserror::Error;

use crate::domain::{
    carts::CartsServiceError, gateways::GatewaysServiceError, sessions::SessionsServiceError,
    settings::SettingsServiceError,
};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("cart not found")]
    CartNotFound,

    #[error("discount calculation failed")]
    Discount(#[from] DiscountError),

    #[error("failed to load discount settings")]
    Settings(#[from] SettingsServiceError),

    #[error("failed to load payment gateways")]
    Gateways(#[from] GatewaysServiceError),

    #[error("cart storage error")]
    Carts(#[source] CartsServiceError),

    #[error("session storage error")]
    Sessions(#[source] SessionsServiceError),
}

impl From<CartsServiceError> for CheckoutServiceError {
    fn from(error: CartsServiceError) -> Self {
        match error {
            CartsServiceError::NotFound => Self::CartNotFound,
            error => Self::Carts(error),
        }
    }
}

impl From<SessionsServiceError> for CheckoutServiceError {
    fn from(error: SessionsServiceError) -> Self {
        match error {
            SessionsServiceError::NotFound => Self::CartNotFound,
            error => Self::Sessions(error),
        }
    }
}
