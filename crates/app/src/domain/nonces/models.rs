//! Nonce Models

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Default nonce lifetime, one day.
pub const DEFAULT_NONCE_LIFETIME: SignedDuration = SignedDuration::from_hours(24);

/// The request a nonce authorises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonceAction {
    /// Checkout selection notifications, bound to a cart.
    PaymentDiscount,

    /// Settings form submissions, bound to an administrator.
    PaymentDiscountSettings,
}

impl NonceAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PaymentDiscount => "payment_discount",
            Self::PaymentDiscountSettings => "payment_discount_settings",
        }
    }
}

impl fmt::Display for NonceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A freshly issued nonce. The token is only ever shown here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedNonce {
    pub token: String,
    pub expires_at: Timestamp,
}
