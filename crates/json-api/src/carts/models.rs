//! Cart response models shared by the cart and checkout handlers.

use rusty_money::{Money, iso::Currency};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tender_app::domain::carts::models::{Cart, CartFee};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// Merchandise subtotal in minor units
    pub subtotal: i64,

    /// Fee lines in display order
    pub fees: Vec<CartFeeResponse>,

    /// Subtotal plus every fee line, in minor units
    pub total: i64,

    /// Total formatted in the store currency
    pub formatted_total: String,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl CartResponse {
    pub(crate) fn new(cart: Cart, currency: &Currency) -> Self {
        let total = cart.total();

        Self {
            uuid: cart.uuid.into_uuid(),
            subtotal: cart.subtotal,
            fees: CartFeeResponse::list(cart.fees, currency),
            total,
            formatted_total: Money::from_minor(total, currency).to_string(),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Fee Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartFeeResponse {
    /// The unique identifier of the fee line
    pub uuid: Uuid,

    /// Label shown on the order
    pub name: String,

    /// Signed amount in minor units; discounts are negative
    pub amount: i64,

    /// Amount formatted in the store currency
    pub formatted_amount: String,

    /// `payment_method_discount` or `host`
    pub source: String,
}

impl CartFeeResponse {
    pub(crate) fn new(fee: CartFee, currency: &Currency) -> Self {
        Self {
            uuid: fee.uuid.into_uuid(),
            formatted_amount: Money::from_minor(fee.amount, currency).to_string(),
            amount: fee.amount,
            source: fee.source.as_str().to_string(),
            name: fee.name,
        }
    }

    pub(crate) fn list(fees: Vec<CartFee>, currency: &Currency) -> Vec<Self> {
        fees.into_iter()
            .map(|fee| Self::new(fee, currency))
            .collect()
    }
}
