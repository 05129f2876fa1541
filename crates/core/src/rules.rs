//! Discount Rules
//!
//! A [`RuleSet`] maps each payment method to at most one [`DiscountRule`]. Rule sets are
//! replaced wholesale by the settings form and read on every recalculation.

use std::str::FromStr;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::methods::PaymentMethodId;

/// Label used for a discount fee line when the rule has none.
pub const DEFAULT_DISCOUNT_LABEL: &str = "Payment Method Discount";

/// How a rule's value is applied to the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// `value` percent of the subtotal.
    Percentage,

    /// `value` in the store currency's major unit.
    Fixed,
}

impl DiscountKind {
    /// Interpret a submitted kind. Anything other than `percentage` is a fixed amount.
    pub fn from_form(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("percentage") {
            Self::Percentage
        } else {
            Self::Fixed
        }
    }

    /// Form value for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

/// Discount configured for a single payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRule {
    /// Percentage or fixed amount.
    #[serde(rename = "type")]
    pub kind: DiscountKind,

    /// Non-negative discount value.
    pub value: Decimal,

    /// Display label for the fee line.
    #[serde(
        default,
        deserialize_with = "deserialize_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
}

impl DiscountRule {
    /// Create a rule, normalising a blank label to "no label".
    pub fn new(kind: DiscountKind, value: Decimal, label: Option<&str>) -> Self {
        Self {
            kind,
            value: value.max(Decimal::ZERO),
            label: label.and_then(sanitise_label),
        }
    }

    /// Build a rule from raw settings-form input.
    ///
    /// Returns `None` when the value is blank, non-numeric or zero: the form uses an empty
    /// value to remove a method's rule.
    pub fn from_form(kind: &str, value: &str, label: &str) -> Option<Self> {
        let value = parse_discount_value(value);

        if value <= Decimal::ZERO {
            return None;
        }

        Some(Self::new(DiscountKind::from_form(kind), value, Some(label)))
    }

    /// Whether this rule can produce a discount at all.
    pub fn is_active(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Label shown on the fee line.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_DISCOUNT_LABEL)
    }
}

/// Mapping from payment method to its discount rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: FxHashMap<PaymentMethodId, DiscountRule>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rule for a payment method, replacing any previous one.
    pub fn insert(&mut self, method: PaymentMethodId, rule: DiscountRule) -> Option<DiscountRule> {
        self.rules.insert(method, rule)
    }

    /// Remove the rule for a payment method.
    pub fn remove(&mut self, method: &str) -> Option<DiscountRule> {
        self.rules.remove(method)
    }

    /// Rule for a payment method, active or not.
    pub fn get(&self, method: &str) -> Option<&DiscountRule> {
        self.rules.get(method)
    }

    /// Rule for a payment method if it can produce a discount.
    ///
    /// Zero-valued rules are treated as absent.
    pub fn active_rule(&self, method: &str) -> Option<&DiscountRule> {
        self.get(method).filter(|rule| rule.is_active())
    }

    /// Whether the (optional) method has an active rule.
    pub fn has_discount(&self, method: Option<&PaymentMethodId>) -> bool {
        method.is_some_and(|method| self.active_rule(method.as_str()).is_some())
    }

    /// Custom labels configured across all rules.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rules.values().filter_map(|rule| rule.label.as_deref())
    }

    /// Iterate over all rules.
    pub fn iter(&self) -> impl Iterator<Item = (&PaymentMethodId, &DiscountRule)> {
        self.rules.iter()
    }

    /// Number of configured rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<(PaymentMethodId, DiscountRule)> for RuleSet {
    fn from_iter<T: IntoIterator<Item = (PaymentMethodId, DiscountRule)>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Coerce a submitted discount value to a non-negative decimal.
///
/// The longest leading numeric prefix is used (`"12.5abc"` is `12.5`); input without
/// one, and negative values, coerce to zero.
pub fn parse_discount_value(raw: &str) -> Decimal {
    let trimmed = raw.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_point = false;

    for (index, c) in trimmed.char_indices() {
        match c {
            '+' | '-' if index == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => break,
        }

        end = index + c.len_utf8();
    }

    if !seen_digit {
        return Decimal::ZERO;
    }

    trimmed
        .get(..end)
        .map(|prefix| prefix.trim_start_matches('+').trim_end_matches('.'))
        .and_then(|prefix| Decimal::from_str(prefix).ok())
        .map_or(Decimal::ZERO, |value| value.max(Decimal::ZERO))
}

fn deserialize_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;

    Ok(raw.as_deref().and_then(sanitise_label))
}

fn sanitise_label(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| !c.is_control()).collect();
    let trimmed = cleaned.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
