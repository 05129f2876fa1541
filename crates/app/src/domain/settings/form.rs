//! Settings form
//!
//! The administration form posts, for each payment method, a discount kind, a free-text
//! value and a label. Values are coerced rather than rejected: blank, non-numeric, zero and
//! negative values all mean "no rule for this method".

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tender::{
    methods::PaymentMethodId,
    rules::{DiscountRule, RuleSet},
};

use crate::domain::settings::models::DiscountSettings;

/// Submitted settings form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsForm {
    /// Enable checkbox.
    #[serde(default)]
    pub enabled: bool,

    /// Per-method fields, keyed by payment method id.
    #[serde(default)]
    pub payment_methods: BTreeMap<String, MethodForm>,
}

/// Fields submitted for one payment method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodForm {
    /// `percentage`, or anything else for a fixed amount.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Discount value as typed.
    #[serde(default)]
    pub discount_value: FormValue,

    /// Optional fee line label.
    #[serde(default)]
    pub label: String,
}

/// A form value that may arrive as text or as a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    Number(Decimal),
}

impl Default for FormValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl FormValue {
    fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
        }
    }
}

impl SettingsForm {
    /// Build the settings a form submission describes.
    ///
    /// The rule set is rebuilt from scratch: methods omitted from the form, or submitted
    /// with an empty value, end up without a rule.
    #[must_use]
    pub fn into_settings(self) -> DiscountSettings {
        let rules: RuleSet = self
            .payment_methods
            .into_iter()
            .filter_map(|(method, fields)| {
                let method = PaymentMethodId::parse(&method)?;
                let rule = DiscountRule::from_form(
                    &fields.kind,
                    &fields.discount_value.as_text(),
                    &fields.label,
                )?;

                Some((method, rule))
            })
            .collect();

        DiscountSettings {
            enabled: self.enabled,
            rules,
        }
    }
}

impl From<&DiscountSettings> for SettingsForm {
    fn from(settings: &DiscountSettings) -> Self {
        let payment_methods = settings
            .rules
            .iter()
            .map(|(method, rule)| {
                (
                    method.to_string(),
                    MethodForm {
                        kind: rule.kind.as_str().to_string(),
                        discount_value: FormValue::Text(rule.value.normalize().to_string()),
                        label: rule.label.clone().unwrap_or_default(),
                    },
                )
            })
            .collect();

        Self {
            enabled: settings.enabled,
            payment_methods,
        }
    }
}

#[cfg(test)]
mod tests {
    use tender::rules::{DEFAULT_DISCOUNT_LABEL, DiscountKind};
    use testresult::TestResult;

    use super::*;

    fn method_form(kind: &str, value: &str, label: &str) -> MethodForm {
        MethodForm {
            kind: kind.to_string(),
            discount_value: FormValue::Text(value.to_string()),
            label: label.to_string(),
        }
    }

    #[test]
    fn into_settings_keeps_valid_rules() {
        let form = SettingsForm {
            enabled: true,
            payment_methods: BTreeMap::from([
                (
                    "bacs".to_string(),
                    method_form("percentage", "10", "Bank Transfer Discount"),
                ),
                ("cod".to_string(), method_form("fixed", "2.50", "")),
            ]),
        };

        let settings = form.into_settings();
        let bacs = settings.rules.get("bacs");
        let cod = settings.rules.get("cod");

        assert!(settings.enabled);
        assert_eq!(bacs.map(|rule| rule.kind), Some(DiscountKind::Percentage));
        assert_eq!(bacs.map(|rule| rule.value), Some(Decimal::from(10)));
        assert_eq!(cod.map(|rule| rule.value), Some(Decimal::new(250, 2)));
        assert_eq!(
            cod.map(DiscountRule::display_label),
            Some(DEFAULT_DISCOUNT_LABEL)
        );
    }

    #[test]
    fn empty_and_garbage_values_remove_rule() {
        let form = SettingsForm {
            enabled: true,
            payment_methods: BTreeMap::from([
                ("bacs".to_string(), method_form("percentage", "", "Bank")),
                ("cod".to_string(), method_form("fixed", "abc", "")),
                ("cheque".to_string(), method_form("fixed", "-5", "")),
                ("paypal".to_string(), method_form("fixed", "0", "")),
            ]),
        };

        assert!(form.into_settings().rules.is_empty());
    }

    #[test]
    fn blank_method_ids_are_skipped() {
        let form = SettingsForm {
            enabled: false,
            payment_methods: BTreeMap::from([("  ".to_string(), method_form("fixed", "5", ""))]),
        };

        assert!(form.into_settings().rules.is_empty());
    }

    #[test]
    fn unknown_kind_is_fixed() {
        let form = SettingsForm {
            enabled: true,
            payment_methods: BTreeMap::from([("cod".to_string(), method_form("bogus", "5", ""))]),
        };

        let settings = form.into_settings();

        assert_eq!(
            settings.rules.get("cod").map(|rule| rule.kind),
            Some(DiscountKind::Fixed)
        );
    }

    #[test]
    fn deserializes_numbers_and_text() -> TestResult {
        let form: SettingsForm = serde_json::from_str(
            r#"{
                "enabled": true,
                "payment_methods": {
                    "bacs": {"type": "percentage", "discount_value": 10, "label": "Bank"},
                    "cod": {"type": "fixed", "discount_value": "3"}
                }
            }"#,
        )?;

        let settings = form.into_settings();

        assert_eq!(settings.rules.len(), 2);
        assert_eq!(
            settings.rules.get("cod").map(|rule| rule.value),
            Some(Decimal::from(3))
        );

        Ok(())
    }

    #[test]
    fn settings_render_back_into_form() {
        let original = SettingsForm {
            enabled: true,
            payment_methods: BTreeMap::from([(
                "bacs".to_string(),
                method_form("percentage", "10", "Bank"),
            )]),
        };

        let settings = original.clone().into_settings();

        assert_eq!(SettingsForm::from(&settings), original);
    }
}
