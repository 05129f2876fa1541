//! Checkout Models

use tender::{methods::PaymentMethodId, selection::NotificationOutcome};

use crate::domain::carts::models::{Cart, CartFee, CartUuid};

/// Reply to a selection notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionNotice {
    /// The method the session now holds.
    pub payment_method: PaymentMethodId,

    /// Whether the notification was written to the session.
    pub accepted: bool,

    pub outcome: NotificationOutcome,
}

/// The discount currently applied to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedDiscount {
    pub payment_method: PaymentMethodId,
    pub label: String,

    /// Negative amount in minor units.
    pub amount: i64,
}

/// Cart totals after a recalculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutTotals {
    pub cart: CartUuid,
    pub selected_payment_method: Option<PaymentMethodId>,
    pub discount: Option<AppliedDiscount>,
    pub subtotal: i64,
    pub fees: Vec<CartFee>,
    pub total: i64,
}

impl CheckoutTotals {
    pub(crate) fn new(
        cart: &Cart,
        selected_payment_method: Option<PaymentMethodId>,
        discount: Option<AppliedDiscount>,
    ) -> Self {
        Self {
            cart: cart.uuid,
            selected_payment_method,
            discount,
            subtotal: cart.subtotal,
            fees: cart.fees.clone(),
            total: cart.total(),
        }
    }
}

/// A discount on offer for one available gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableDiscount {
    pub payment_method: PaymentMethodId,
    pub title: String,
    pub label: String,

    /// Short description such as `10%` or `£5.00`.
    pub summary: String,
}

const PAYMENT_METHOD_FIELD: &str = "payment_method";

/// Fields read from the checkout's url-encoded order review payload.
#[derive(Debug, Clone, Default)]
pub(crate) struct OrderReviewFields {
    pub payment_method: Option<String>,
}

impl OrderReviewFields {
    /// Parse the payload leniently; anything unreadable carries no selection.
    ///
    /// A repeated field keeps its last value, the way form posts are usually read.
    pub(crate) fn parse(post_data: &str) -> Self {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(post_data).unwrap_or_default();

        let payment_method = pairs
            .into_iter()
            .rev()
            .find_map(|(key, value)| (key == PAYMENT_METHOD_FIELD).then_some(value));

        Self { payment_method }
    }

    pub(crate) fn method(&self) -> Option<PaymentMethodId> {
        PaymentMethodId::parse_opt(self.payment_method.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_review_reads_payment_method() {
        let fields = OrderReviewFields::parse(
            "billing_first_name=Ada&payment_method=bacs&terms=on&_wpnonce=abc",
        );

        assert_eq!(fields.method().map(|method| method.to_string()), Some("bacs".to_string()));
    }

    #[test]
    fn order_review_decodes_and_trims_value() {
        let fields = OrderReviewFields::parse("payment_method=%20cod%20");

        assert_eq!(fields.method().map(|method| method.to_string()), Some("cod".to_string()));
    }

    #[test]
    fn order_review_repeated_method_keeps_last_value() {
        let fields = OrderReviewFields::parse("payment_method=cod&payment_method=bacs");

        assert_eq!(fields.method().map(|method| method.to_string()), Some("bacs".to_string()));
    }

    #[test]
    fn order_review_ignores_similarly_named_fields() {
        let fields =
            OrderReviewFields::parse("payment_method=cheque&payment_method_title=Cash&x=1");

        assert_eq!(fields.method().map(|method| method.to_string()), Some("cheque".to_string()));
    }

    #[test]
    fn order_review_without_method_is_empty() {
        assert!(OrderReviewFields::parse("billing_email=a%40b.c").method().is_none());
        assert!(OrderReviewFields::parse("payment_method=").method().is_none());
        assert!(OrderReviewFields::parse("").method().is_none());
    }
}
