//! Cart Models

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use tender::fees::{FeeLine, FeeSource};

use crate::uuids::TypedUuid;

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Fee UUID
pub type CartFeeUuid = TypedUuid<CartFee>;

/// Cart Model
#[derive(Debug, Clone)]
pub struct Cart {
    pub uuid: CartUuid,

    /// Merchandise subtotal in minor units.
    pub subtotal: i64,

    /// Fee lines in display order.
    pub fees: Vec<CartFee>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Cart {
    /// Subtotal plus every fee line, in minor units.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.fees
            .iter()
            .fold(self.subtotal, |total, fee| total.saturating_add(fee.amount))
    }

    /// Subtotal as money in the store currency.
    #[must_use]
    pub fn subtotal_money<'a>(&self, currency: &'a Currency) -> Money<'a, Currency> {
        Money::from_minor(self.subtotal, currency)
    }

    /// Fee lines as the pricing pipeline sees them.
    #[must_use]
    pub fn fee_lines<'a>(&self, currency: &'a Currency) -> Vec<FeeLine<'a>> {
        self.fees
            .iter()
            .map(|fee| FeeLine {
                name: fee.name.clone(),
                amount: Money::from_minor(fee.amount, currency),
                source: fee.source,
            })
            .collect()
    }
}

/// Cart Fee Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartFee {
    pub uuid: CartFeeUuid,
    pub name: String,

    /// Signed amount in minor units; discounts are negative.
    pub amount: i64,

    pub source: FeeSource,
    pub created_at: Timestamp,
}

/// New Cart Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCart {
    pub uuid: CartUuid,
    pub subtotal: i64,
}

/// New Cart Fee Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartFee {
    pub uuid: CartFeeUuid,
    pub name: String,
    pub amount: i64,
    pub source: FeeSource,
}

impl NewCartFee {
    /// A fee added by something other than discount reconciliation.
    #[must_use]
    pub fn host(name: impl Into<String>, amount: i64) -> Self {
        Self {
            uuid: CartFeeUuid::new(),
            name: name.into(),
            amount,
            source: FeeSource::Host,
        }
    }
}

/// Replacement for a cart's payment-method discount lines.
///
/// Applied under the cart lock, it touches discount lines only, so host fees added since
/// the cart was read are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscountLineUpdate {
    /// Names that identify unmarked discount lines.
    pub labels: Vec<String>,

    /// Line appended once the old ones are gone.
    pub discount: Option<NewCartFee>,
}

impl From<&FeeLine<'_>> for NewCartFee {
    fn from(fee: &FeeLine<'_>) -> Self {
        Self {
            uuid: CartFeeUuid::new(),
            name: fee.name.clone(),
            amount: fee.amount.to_minor_units(),
            source: fee.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;

    use super::*;

    fn cart(fees: Vec<CartFee>) -> Cart {
        Cart {
            uuid: CartUuid::new(),
            subtotal: 100_00,
            fees,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }

    fn fee(name: &str, amount: i64, source: FeeSource) -> CartFee {
        CartFee {
            uuid: CartFeeUuid::new(),
            name: name.to_string(),
            amount,
            source,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn total_adds_fee_lines_to_subtotal() {
        let cart = cart(vec![
            fee("Gift wrap", 3_00, FeeSource::Host),
            fee("Bank Transfer Discount", -10_00, FeeSource::PaymentMethodDiscount),
        ]);

        assert_eq!(cart.total(), 93_00);
    }

    #[test]
    fn fee_lines_keep_order_and_source() {
        let cart = cart(vec![
            fee("Gift wrap", 3_00, FeeSource::Host),
            fee("Payment Method Discount", -2_00, FeeSource::PaymentMethodDiscount),
        ]);

        let lines = cart.fee_lines(GBP);

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines.last().map(|line| (line.amount.to_minor_units(), line.source)),
            Some((-2_00, FeeSource::PaymentMethodDiscount))
        );
    }

    #[test]
    fn new_cart_fee_from_fee_line_copies_values() {
        let line = FeeLine::host("Card surcharge", Money::from_minor(1_50, GBP));
        let fee = NewCartFee::from(&line);

        assert_eq!(fee.name, "Card surcharge");
        assert_eq!(fee.amount, 1_50);
        assert_eq!(fee.source, FeeSource::Host);
    }
}
