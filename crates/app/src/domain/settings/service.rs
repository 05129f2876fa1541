//! Settings service.

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use tender::rules::RuleSet;
use tracing::warn;

use crate::{
    database::Db,
    domain::settings::{
        errors::SettingsServiceError,
        models::{DiscountSettings, ENABLED_OPTION, RULES_OPTION},
        repository::PgOptionsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgSettingsService {
    db: Db,
    repository: PgOptionsRepository,
}

impl PgSettingsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOptionsRepository::new(),
        }
    }
}

#[async_trait]
impl SettingsService for PgSettingsService {
    async fn get_settings(&self) -> Result<DiscountSettings, SettingsServiceError> {
        let mut tx = self.db.begin().await?;

        let enabled = self.repository.get_option(&mut tx, ENABLED_OPTION).await?;
        let rules = self.repository.get_option(&mut tx, RULES_OPTION).await?;

        tx.commit().await?;

        Ok(DiscountSettings {
            enabled: enabled.as_ref().is_some_and(stored_flag),
            rules: rules.map(stored_rules).unwrap_or_default(),
        })
    }

    async fn save_settings(
        &self,
        settings: DiscountSettings,
    ) -> Result<DiscountSettings, SettingsServiceError> {
        let rules = serde_json::to_value(&settings.rules)?;

        let mut tx = self.db.begin().await?;

        self.repository
            .set_option(&mut tx, ENABLED_OPTION, Value::Bool(settings.enabled))
            .await?;

        self.repository
            .set_option(&mut tx, RULES_OPTION, rules)
            .await?;

        tx.commit().await?;

        Ok(settings)
    }
}

/// Interpret a stored enabled flag; anything unrecognised is off.
fn stored_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_i64().is_some_and(|number| number != 0),
        Value::String(text) => matches!(text.as_str(), "1" | "yes" | "true"),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Interpret a stored rule set; a malformed value means no rules.
fn stored_rules(value: Value) -> RuleSet {
    serde_json::from_value(value).unwrap_or_else(|error| {
        warn!(%error, "ignoring malformed stored discount rules");

        RuleSet::default()
    })
}

#[automock]
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Current enabled flag and rule set; defaults when nothing is stored.
    async fn get_settings(&self) -> Result<DiscountSettings, SettingsServiceError>;

    /// Replace the enabled flag and rule set together.
    async fn save_settings(
        &self,
        settings: DiscountSettings,
    ) -> Result<DiscountSettings, SettingsServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use tender::{
        methods::PaymentMethodId,
        rules::{DiscountKind, DiscountRule},
    };
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[test]
    fn stored_flag_accepts_legacy_forms() {
        assert!(stored_flag(&json!(true)));
        assert!(stored_flag(&json!(1)));
        assert!(stored_flag(&json!("yes")));
        assert!(!stored_flag(&json!(0)));
        assert!(!stored_flag(&json!("no")));
        assert!(!stored_flag(&Value::Null));
    }

    #[test]
    fn stored_rules_ignores_malformed_values() {
        assert!(stored_rules(json!("not a map")).is_empty());
        assert!(stored_rules(json!({"bacs": {"type": "percentage"}})).is_empty());
    }

    #[test]
    fn stored_rules_reads_rule_map() {
        let rules = stored_rules(json!({
            "bacs": {"type": "percentage", "value": 10, "label": "Bank Transfer Discount"}
        }));

        assert_eq!(
            rules.get("bacs").map(|rule| rule.value),
            Some(Decimal::from(10))
        );
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL testcontainer"]
    async fn get_settings_defaults_when_nothing_stored() -> TestResult {
        let ctx = TestContext::new().await;

        let settings = ctx.settings.get_settings().await?;

        assert_eq!(settings, DiscountSettings::default());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL testcontainer"]
    async fn save_settings_round_trips() -> TestResult {
        let ctx = TestContext::new().await;
        let method = PaymentMethodId::parse("bacs").ok_or("expected an id")?;

        let mut rules = RuleSet::new();

        rules.insert(
            method,
            DiscountRule::new(DiscountKind::Percentage, Decimal::from(10), Some("Bank")),
        );

        let saved = ctx
            .settings
            .save_settings(DiscountSettings {
                enabled: true,
                rules,
            })
            .await?;

        assert_eq!(ctx.settings.get_settings().await?, saved);

        let cleared = ctx
            .settings
            .save_settings(DiscountSettings::default())
            .await?;

        assert_eq!(ctx.settings.get_settings().await?, cleared);

        Ok(())
    }
}
