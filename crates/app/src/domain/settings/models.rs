//! Settings Models

use serde::{Deserialize, Serialize};
use tender::rules::RuleSet;

/// Option key holding the enabled flag.
pub const ENABLED_OPTION: &str = "payment_discount_enabled";

/// Option key holding the rule set.
pub const RULES_OPTION: &str = "payment_discount_rules";

/// Discount configuration as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountSettings {
    /// Whether discounts are applied at all.
    #[serde(default)]
    pub enabled: bool,

    /// Rule per payment method.
    #[serde(default)]
    pub rules: RuleSet,
}
