//! Gateway Models

use serde::Serialize;
use tender::methods::PaymentMethodId;

/// A payment gateway known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gateway {
    pub id: PaymentMethodId,
    pub title: String,
    pub enabled: bool,
    pub position: i32,
}

/// New Gateway Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGateway {
    pub id: PaymentMethodId,
    pub title: String,
    pub enabled: bool,
    pub position: i32,
}
