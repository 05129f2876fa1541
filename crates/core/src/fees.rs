//! Fee lines and discount reconciliation
//!
//! An order's fee collection holds at most one payment-method discount line. Before a new
//! discount is added every existing one is removed, whichever method produced it.

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{
    discounts::PaymentDiscount,
    rules::{DEFAULT_DISCOUNT_LABEL, RuleSet},
};

/// Origin of a fee line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeSource {
    /// Added by payment-method discount reconciliation.
    PaymentMethodDiscount,

    /// Added by anything else (surcharges, gift wrap, ...).
    Host,
}

impl FeeSource {
    /// Stored representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PaymentMethodDiscount => "payment_method_discount",
            Self::Host => "host",
        }
    }

    /// Parse the stored representation; unknown values are host fees.
    pub fn from_stored(raw: &str) -> Self {
        if raw == Self::PaymentMethodDiscount.as_str() {
            Self::PaymentMethodDiscount
        } else {
            Self::Host
        }
    }
}

/// A named, possibly negative adjustment to an order total.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeLine<'a> {
    /// Display name.
    pub name: String,

    /// Signed amount; discounts are negative.
    pub amount: Money<'a, Currency>,

    /// Who added the line.
    pub source: FeeSource,
}

impl<'a> FeeLine<'a> {
    /// A fee line added by something other than discount reconciliation.
    pub fn host(name: impl Into<String>, amount: Money<'a, Currency>) -> Self {
        Self {
            name: name.into(),
            amount,
            source: FeeSource::Host,
        }
    }
}

impl<'a> From<PaymentDiscount<'a>> for FeeLine<'a> {
    fn from(discount: PaymentDiscount<'a>) -> Self {
        Self {
            name: discount.label,
            amount: discount.amount,
            source: FeeSource::PaymentMethodDiscount,
        }
    }
}

/// Labels that identify a payment-method discount line: the default label plus every
/// configured rule label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownLabels(FxHashSet<String>);

impl KnownLabels {
    /// Collect the labels for a rule set.
    pub fn from_rules(rules: &RuleSet) -> Self {
        let mut labels = FxHashSet::default();

        labels.insert(DEFAULT_DISCOUNT_LABEL.to_string());
        labels.extend(rules.labels().map(str::to_string));

        Self(labels)
    }

    /// Whether `name` is a known discount label.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// The labels, sorted.
    pub fn sorted(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.0.iter().map(String::as_str).collect();

        labels.sort_unstable();

        labels
    }

    /// Whether `fee` is a payment-method discount line.
    ///
    /// Lines carrying the discount source marker always match, so a line applied under a
    /// label that has since been renamed is still recognised.
    pub fn matches(&self, fee: &FeeLine<'_>) -> bool {
        fee.source == FeeSource::PaymentMethodDiscount || self.contains(&fee.name)
    }
}

/// Replace every payment-method discount line in `current` with `discount`, if any.
///
/// Other fee lines keep their relative order; the new discount line goes last.
pub fn reconcile<'a>(
    current: impl IntoIterator<Item = FeeLine<'a>>,
    labels: &KnownLabels,
    discount: Option<PaymentDiscount<'a>>,
) -> Vec<FeeLine<'a>> {
    let mut fees: Vec<FeeLine<'a>> = current
        .into_iter()
        .filter(|fee| !labels.matches(fee))
        .collect();

    fees.extend(discount.map(FeeLine::from));

    fees
}

/// Number of payment-method discount lines in `fees`.
pub fn count_discount_lines(fees: &[FeeLine<'_>], labels: &KnownLabels) -> usize {
    fees.iter().filter(|fee| labels.matches(fee)).count()
}
