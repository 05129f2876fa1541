//! Recalculation
//!
//! One pass of the pricing pipeline for a cart: work out which method is selected, resolve
//! its discount and reconcile the cart's fee lines so that exactly that discount (or
//! none) is present afterwards.

use rusty_money::{Money, iso::Currency};

use crate::{
    discounts::{self, DiscountError, PaymentDiscount},
    fees::{self, FeeLine, KnownLabels},
    methods::PaymentMethodId,
    rules::RuleSet,
    selection::SelectionSources,
};

/// Everything a recalculation reads.
#[derive(Debug, Clone)]
pub struct RecalculationInput<'r, 'a> {
    /// Whether payment-method discounts are switched on.
    pub enabled: bool,

    /// Configured rules.
    pub rules: &'r RuleSet,

    /// Where the selected method can come from.
    pub sources: &'r SelectionSources,

    /// Cart subtotal, the discount base.
    pub subtotal: Money<'a, Currency>,

    /// Current fee lines, in order.
    pub fees: Vec<FeeLine<'a>>,
}

/// Result of a recalculation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Recalculation<'a> {
    /// The method the pass resolved as selected.
    pub selected: Option<PaymentMethodId>,

    /// The discount now applied, if any.
    pub discount: Option<PaymentDiscount<'a>>,

    /// Fee lines after reconciliation.
    pub fees: Vec<FeeLine<'a>>,

    /// Number of discount lines removed before the new one was added.
    pub removed: usize,

    /// Labels that identified unmarked discount lines during the pass.
    pub labels: KnownLabels,
}

impl Recalculation<'_> {
    /// Whether the pass changed the fee collection it was given.
    pub fn changed_from(&self, before: &[FeeLine<'_>]) -> bool {
        self.fees.len() != before.len()
            || self
                .fees
                .iter()
                .zip(before)
                .any(|(after, before)| {
                    after.name != before.name
                        || after.source != before.source
                        || after.amount.to_minor_units() != before.amount.to_minor_units()
                })
    }
}

/// Run one recalculation pass.
///
/// When discounts are disabled every existing discount line is still removed.
///
/// # Errors
///
/// Returns an error if the discount amount cannot be represented in the subtotal's
/// currency.
pub fn recalculate<'a>(
    input: RecalculationInput<'_, 'a>,
) -> Result<Recalculation<'a>, DiscountError> {
    let RecalculationInput {
        enabled,
        rules,
        sources,
        subtotal,
        fees,
    } = input;

    let labels = KnownLabels::from_rules(rules);
    let removed = fees::count_discount_lines(&fees, &labels);
    let selected = sources.resolve().cloned();

    let discount = discounts::resolve(enabled, rules, selected.as_ref(), &subtotal)?;
    let fees = fees::reconcile(fees, &labels, discount.clone());

    Ok(Recalculation {
        selected,
        discount,
        fees,
        removed,
        labels,
    })
}
