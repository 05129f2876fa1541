//! Discount resolution
//!
//! Turns the rule for the selected payment method into the (negative) amount that the
//! discount fee line carries. The discount never exceeds the subtotal.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    methods::PaymentMethodId,
    rules::{DiscountKind, DiscountRule, RuleSet},
};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A fixed amount could not be represented in minor units.
    #[error("fixed amount {0} cannot be represented in minor units")]
    AmountConversion(Decimal),
}

/// A resolved payment-method discount, ready to become a fee line.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDiscount<'a> {
    /// Payment method that produced the discount.
    pub method: PaymentMethodId,

    /// Fee line label.
    pub label: String,

    /// Negative adjustment to the order total.
    pub amount: Money<'a, Currency>,
}

/// Resolve the discount for the selected payment method.
///
/// Returns `Ok(None)` when discounts are disabled, nothing is selected, the method has no
/// active rule, or the clamped amount is not positive.
///
/// # Errors
///
/// Returns an error if the percentage or fixed amount cannot be represented in the
/// subtotal's minor units.
pub fn resolve<'a>(
    enabled: bool,
    rules: &RuleSet,
    selected: Option<&PaymentMethodId>,
    subtotal: &Money<'a, Currency>,
) -> Result<Option<PaymentDiscount<'a>>, DiscountError> {
    if !enabled {
        return Ok(None);
    }

    let Some(method) = selected else {
        return Ok(None);
    };

    let Some(rule) = rules.active_rule(method.as_str()) else {
        return Ok(None);
    };

    let currency = subtotal.currency();
    let subtotal_minor = subtotal.to_minor_units();
    let discount_minor = rule_amount_minor(rule, subtotal_minor, currency)?.min(subtotal_minor);

    if discount_minor <= 0 {
        return Ok(None);
    }

    Ok(Some(PaymentDiscount {
        method: method.clone(),
        label: rule.display_label().to_string(),
        amount: Money::from_minor(-discount_minor, currency),
    }))
}

/// Unclamped discount of `rule` against a subtotal, in minor units.
///
/// # Errors
///
/// Returns an error if the amount overflows.
pub fn rule_amount_minor(
    rule: &DiscountRule,
    subtotal_minor: i64,
    currency: &Currency,
) -> Result<i64, DiscountError> {
    match rule.kind {
        DiscountKind::Percentage => {
            let fraction = rule
                .value
                .checked_div(Decimal::ONE_HUNDRED)
                .ok_or(DiscountError::PercentConversion)?;

            percent_of_minor(&Percentage::from(fraction), subtotal_minor)
        }
        DiscountKind::Fixed => major_to_minor(rule.value, currency),
    }
}

/// Short human description of a rule, e.g. `10%` or `£5.00`.
///
/// # Errors
///
/// Returns an error if a fixed amount cannot be represented in minor units.
pub fn describe(rule: &DiscountRule, currency: &Currency) -> Result<String, DiscountError> {
    match rule.kind {
        DiscountKind::Percentage => Ok(format!("{}%", rule.value.normalize())),
        DiscountKind::Fixed => {
            let minor = major_to_minor(rule.value, currency)?;

            Ok(Money::from_minor(minor, currency).to_string())
        }
    }
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows or cannot be
/// safely represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from(minor);

    ((*percent) * Decimal::ONE) // Percentage does not expose its inner Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Convert a major-unit amount (e.g. `2.50`) to minor units for `currency`.
///
/// # Errors
///
/// Returns [`DiscountError::AmountConversion`] if the amount overflows.
pub fn major_to_minor(amount: Decimal, currency: &Currency) -> Result<i64, DiscountError> {
    let scale = 10_i64
        .checked_pow(currency.exponent)
        .ok_or(DiscountError::AmountConversion(amount))?;

    amount
        .checked_mul(Decimal::from(scale))
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_i64())
        .ok_or(DiscountError::AmountConversion(amount))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, JPY};
    use testresult::TestResult;

    use super::*;

    fn method(id: &str) -> PaymentMethodId {
        PaymentMethodId::parse(id).unwrap_or_else(|| unreachable!("fixture ids are non-empty"))
    }

    fn rules() -> RuleSet {
        [
            (
                method("bacs"),
                DiscountRule::new(
                    DiscountKind::Percentage,
                    Decimal::from(10),
                    Some("Bank Transfer Discount"),
                ),
            ),
            (
                method("cod"),
                DiscountRule::new(DiscountKind::Fixed, Decimal::from(20), Some("")),
            ),
            (
                method("cheque"),
                DiscountRule::new(DiscountKind::Fixed, Decimal::ZERO, Some("Cheque")),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn percentage_rule_discounts_share_of_subtotal() -> TestResult {
        let subtotal = Money::from_minor(100_00, GBP);
        let discount = resolve(true, &rules(), Some(&method("bacs")), &subtotal)?
            .ok_or("expected a discount")?;

        assert_eq!(discount.label, "Bank Transfer Discount");
        assert_eq!(discount.amount, Money::from_minor(-10_00, GBP));
        assert_eq!(discount.method, method("bacs"));

        Ok(())
    }

    #[test]
    fn fixed_rule_is_clamped_to_subtotal_with_default_label() -> TestResult {
        let subtotal = Money::from_minor(5_00, GBP);
        let discount = resolve(true, &rules(), Some(&method("cod")), &subtotal)?
            .ok_or("expected a discount")?;

        assert_eq!(discount.label, "Payment Method Discount");
        assert_eq!(discount.amount, Money::from_minor(-5_00, GBP));

        Ok(())
    }

    #[test]
    fn fixed_rule_below_subtotal_is_not_clamped() -> TestResult {
        let subtotal = Money::from_minor(50_00, GBP);
        let discount = resolve(true, &rules(), Some(&method("cod")), &subtotal)?
            .ok_or("expected a discount")?;

        assert_eq!(discount.amount, Money::from_minor(-20_00, GBP));

        Ok(())
    }

    #[test]
    fn disabled_resolves_to_none() -> TestResult {
        let subtotal = Money::from_minor(100_00, GBP);

        assert_eq!(
            resolve(false, &rules(), Some(&method("bacs")), &subtotal)?,
            None
        );

        Ok(())
    }

    #[test]
    fn missing_selection_or_rule_resolves_to_none() -> TestResult {
        let subtotal = Money::from_minor(100_00, GBP);

        assert_eq!(resolve(true, &rules(), None, &subtotal)?, None);
        assert_eq!(
            resolve(true, &rules(), Some(&method("paypal")), &subtotal)?,
            None
        );

        Ok(())
    }

    #[test]
    fn zero_value_rule_resolves_to_none() -> TestResult {
        let subtotal = Money::from_minor(100_00, GBP);

        assert_eq!(
            resolve(true, &rules(), Some(&method("cheque")), &subtotal)?,
            None
        );

        Ok(())
    }

    #[test]
    fn empty_subtotal_resolves_to_none() -> TestResult {
        let subtotal = Money::from_minor(0, GBP);

        assert_eq!(resolve(true, &rules(), Some(&method("bacs")), &subtotal)?, None);
        assert_eq!(resolve(true, &rules(), Some(&method("cod")), &subtotal)?, None);

        Ok(())
    }

    #[test]
    fn percentage_rounds_half_away_from_zero() -> TestResult {
        // 10% of 0.05 is 0.005, which rounds to one minor unit.
        let subtotal = Money::from_minor(5, GBP);
        let discount = resolve(true, &rules(), Some(&method("bacs")), &subtotal)?
            .ok_or("expected a discount")?;

        assert_eq!(discount.amount, Money::from_minor(-1, GBP));

        Ok(())
    }

    #[test]
    fn percentage_over_one_hundred_is_clamped() -> TestResult {
        let rules: RuleSet = [(
            method("bacs"),
            DiscountRule::new(DiscountKind::Percentage, Decimal::from(150), None),
        )]
        .into_iter()
        .collect();

        let subtotal = Money::from_minor(40_00, GBP);
        let discount = resolve(true, &rules, Some(&method("bacs")), &subtotal)?
            .ok_or("expected a discount")?;

        assert_eq!(discount.amount, Money::from_minor(-40_00, GBP));

        Ok(())
    }

    #[test]
    fn percentage_property_holds_across_subtotals() -> TestResult {
        for percent in [1_i64, 5, 10, 33, 50, 99, 100, 250] {
            let rules: RuleSet = [(
                method("bacs"),
                DiscountRule::new(DiscountKind::Percentage, Decimal::from(percent), None),
            )]
            .into_iter()
            .collect();

            for minor in [0_i64, 1, 99, 100, 12_345, 1_000_000] {
                let subtotal = Money::from_minor(minor, GBP);
                let expected = percent_of_minor(
                    &Percentage::from(Decimal::new(percent, 2)),
                    minor,
                )?
                .min(minor);

                let amount = resolve(true, &rules, Some(&method("bacs")), &subtotal)?
                    .map_or(0, |discount| discount.amount.to_minor_units());

                assert_eq!(amount, -expected, "{percent}% of {minor}");
            }
        }

        Ok(())
    }

    #[test]
    fn fixed_property_holds_across_subtotals() -> TestResult {
        for value in [0_i64, 1, 250, 1_000] {
            let rules: RuleSet = [(
                method("cod"),
                DiscountRule::new(DiscountKind::Fixed, Decimal::new(value, 2), None),
            )]
            .into_iter()
            .collect();

            for minor in [0_i64, 1, 100, 500, 2_000] {
                let subtotal = Money::from_minor(minor, GBP);
                let amount = resolve(true, &rules, Some(&method("cod")), &subtotal)?
                    .map(|discount| discount.amount.to_minor_units());

                let expected = value.min(minor);

                if expected == 0 {
                    assert_eq!(amount, None, "{value} off {minor} should be none");
                } else {
                    assert_eq!(amount, Some(-expected), "{value} off {minor}");
                }
            }
        }

        Ok(())
    }

    #[test]
    fn major_to_minor_respects_currency_exponent() -> TestResult {
        assert_eq!(major_to_minor(Decimal::new(250, 2), GBP)?, 250);
        assert_eq!(major_to_minor(Decimal::from(500), JPY)?, 500);

        Ok(())
    }

    #[test]
    fn describe_formats_both_kinds() -> TestResult {
        let percentage = DiscountRule::new(DiscountKind::Percentage, Decimal::new(1000, 2), None);
        let fixed = DiscountRule::new(DiscountKind::Fixed, Decimal::from(5), None);

        assert_eq!(describe(&percentage, GBP)?, "10%");
        assert_eq!(
            describe(&fixed, GBP)?,
            Money::from_minor(5_00, GBP).to_string()
        );

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let percent = Percentage::from(2.0);
        let result = percent_of_minor(&percent, i64::MAX);

        assert!(matches!(result, Err(DiscountError::PercentConversion)));
    }
}
