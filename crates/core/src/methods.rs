//! Payment Methods

use std::{
    borrow::Borrow,
    fmt::{Display, Formatter, Result as FmtResult},
};

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a checkout payment option (e.g. `bacs`, `cod`).
///
/// Identifiers are sanitised on construction: surrounding whitespace and control
/// characters are removed, and an identifier that is empty afterwards is not an
/// identifier at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PaymentMethodId(String);

impl PaymentMethodId {
    /// Sanitise raw request or form input into an identifier.
    ///
    /// Returns `None` when nothing is left after sanitising, which callers treat as
    /// "no payment method selected".
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned: String = raw.chars().filter(|c| !c.is_control()).collect();
        let trimmed = cleaned.trim();

        if trimmed.is_empty() {
            return None;
        }

        Some(Self(trimmed.to_string()))
    }

    /// Sanitise optional input, treating absent and empty values alike.
    pub fn parse_opt(raw: Option<&str>) -> Option<Self> {
        raw.and_then(Self::parse)
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PaymentMethodId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PaymentMethodId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PaymentMethodId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PaymentMethodId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom("empty payment method id"))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let id = PaymentMethodId::parse("  bacs \n");

        assert_eq!(id.as_ref().map(PaymentMethodId::as_str), Some("bacs"));
    }

    #[test]
    fn parse_strips_control_characters() {
        let id = PaymentMethodId::parse("co\u{0}d\t");

        assert_eq!(id.as_ref().map(PaymentMethodId::as_str), Some("cod"));
    }

    #[test]
    fn parse_rejects_blank_input() {
        assert_eq!(PaymentMethodId::parse(""), None);
        assert_eq!(PaymentMethodId::parse("   "), None);
        assert_eq!(PaymentMethodId::parse_opt(None), None);
    }

    #[test]
    fn deserialize_rejects_empty_string() {
        let result: Result<PaymentMethodId, _> = serde_json::from_str("\"  \"");

        assert!(result.is_err(), "blank identifiers should not deserialize");
    }

    #[test]
    fn serializes_as_plain_string() -> TestResult {
        let id = PaymentMethodId::parse("cheque").ok_or("expected an id")?;

        assert_eq!(serde_json::to_string(&id)?, "\"cheque\"");

        Ok(())
    }
}
