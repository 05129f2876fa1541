//! Checkout response models.

use rusty_money::{Money, iso::Currency};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tender_app::domain::checkout::models::{
    AppliedDiscount, AvailableDiscount, CheckoutTotals, SelectionNotice,
};

use crate::carts::models::CartFeeResponse;

/// Cart totals after a recalculation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutTotalsResponse {
    /// The cart that was recalculated
    pub cart: Uuid,

    /// Payment method the discount was resolved for
    pub selected_payment_method: Option<String>,

    /// The discount line now on the cart, if any
    pub discount: Option<AppliedDiscountResponse>,

    /// Merchandise subtotal in minor units
    pub subtotal: i64,

    /// Fee lines in display order
    pub fees: Vec<CartFeeResponse>,

    /// Subtotal plus every fee line, in minor units
    pub total: i64,

    /// Total formatted in the store currency
    pub formatted_total: String,
}

impl CheckoutTotalsResponse {
    pub(crate) fn new(totals: CheckoutTotals, currency: &Currency) -> Self {
        Self {
            cart: totals.cart.into_uuid(),
            selected_payment_method: totals
                .selected_payment_method
                .map(|method| method.to_string()),
            discount: totals
                .discount
                .map(|discount| AppliedDiscountResponse::new(discount, currency)),
            subtotal: totals.subtotal,
            fees: CartFeeResponse::list(totals.fees, currency),
            total: totals.total,
            formatted_total: Money::from_minor(totals.total, currency).to_string(),
        }
    }
}

/// The payment method discount applied to a cart.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AppliedDiscountResponse {
    pub payment_method: String,
    pub label: String,

    /// Negative amount in minor units
    pub amount: i64,

    pub formatted_amount: String,
}

impl AppliedDiscountResponse {
    fn new(discount: AppliedDiscount, currency: &Currency) -> Self {
        Self {
            payment_method: discount.payment_method.to_string(),
            label: discount.label,
            amount: discount.amount,
            formatted_amount: Money::from_minor(discount.amount, currency).to_string(),
        }
    }
}

/// Reply to the storefront's selection notification.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SelectionResponse {
    /// Whether the storefront should refresh the checkout
    pub discount_applied: bool,

    /// Whether the selected method has an active rule
    pub has_discount: bool,

    /// Whether the previously stored method had an active rule
    pub previous_had_discount: bool,

    /// The method the session now holds
    pub payment_method: String,

    /// Whether the notification was written to the session
    pub accepted: bool,
}

impl From<SelectionNotice> for SelectionResponse {
    fn from(notice: SelectionNotice) -> Self {
        Self {
            discount_applied: notice.outcome.discount_applied,
            has_discount: notice.outcome.has_discount,
            previous_had_discount: notice.outcome.previous_had_discount,
            payment_method: notice.payment_method.to_string(),
            accepted: notice.accepted,
        }
    }
}

/// A discount on offer for one available gateway.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AvailableDiscountResponse {
    pub payment_method: String,

    /// Gateway title
    pub title: String,

    /// Fee line label the discount would use
    pub label: String,

    /// Short description such as `10%` or `£5.00`
    pub summary: String,
}

impl From<AvailableDiscount> for AvailableDiscountResponse {
    fn from(discount: AvailableDiscount) -> Self {
        Self {
            payment_method: discount.payment_method.to_string(),
            title: discount.title,
            label: discount.label,
            summary: discount.summary,
        }
    }
}
