//! Settings request and response models.

use std::collections::BTreeMap;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tender::rules::DiscountRule;
use tender_app::domain::{
    gateways::models::Gateway,
    settings::{
        form::{FormValue, MethodForm, SettingsForm},
        models::DiscountSettings,
    },
};

/// Current settings, one entry per available payment gateway.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SettingsResponse {
    /// Whether discounts are applied at checkout
    pub enabled: bool,

    /// Gateways in display order with their rule, if any
    pub payment_methods: Vec<MethodSettingsResponse>,
}

impl SettingsResponse {
    pub(crate) fn new(settings: &DiscountSettings, gateways: Vec<Gateway>) -> Self {
        Self {
            enabled: settings.enabled,
            payment_methods: gateways
                .into_iter()
                .map(|gateway| MethodSettingsResponse {
                    rule: settings
                        .rules
                        .get(gateway.id.as_str())
                        .map(RuleResponse::from),
                    payment_method: gateway.id.to_string(),
                    title: gateway.title,
                })
                .collect(),
        }
    }
}

/// One gateway row of the settings form.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MethodSettingsResponse {
    pub payment_method: String,
    pub title: String,
    pub rule: Option<RuleResponse>,
}

/// A stored discount rule.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RuleResponse {
    /// `percentage` or `fixed`
    #[serde(rename = "type")]
    pub kind: String,

    pub discount_value: String,
    pub label: String,
}

impl From<&DiscountRule> for RuleResponse {
    fn from(rule: &DiscountRule) -> Self {
        Self {
            kind: rule.kind.as_str().to_string(),
            discount_value: rule.value.normalize().to_string(),
            label: rule.label.clone().unwrap_or_default(),
        }
    }
}

/// Settings form submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateSettingsRequest {
    /// Token issued with the settings form
    #[serde(default)]
    pub nonce: String,

    #[serde(default)]
    pub enabled: bool,

    /// Fields per payment method id; omitted methods lose their rule
    #[serde(default)]
    pub payment_methods: BTreeMap<String, MethodFormRequest>,
}

/// Fields submitted for one payment method.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MethodFormRequest {
    /// `percentage`, or anything else for a fixed amount
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Value as typed, text or number
    #[serde(default)]
    pub discount_value: Value,

    #[serde(default)]
    pub label: String,
}

impl From<UpdateSettingsRequest> for SettingsForm {
    fn from(request: UpdateSettingsRequest) -> Self {
        Self {
            enabled: request.enabled,
            payment_methods: request
                .payment_methods
                .into_iter()
                .map(|(method, fields)| (method, fields.into()))
                .collect(),
        }
    }
}

impl From<MethodFormRequest> for MethodForm {
    fn from(request: MethodFormRequest) -> Self {
        let discount_value = match request.discount_value {
            Value::String(text) => text,
            Value::Number(number) => number.to_string(),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => String::new(),
        };

        Self {
            kind: request.kind,
            discount_value: FormValue::Text(discount_value),
            label: request.label,
        }
    }
}
