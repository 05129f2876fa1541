//! Recalculation Scenarios
//!
//! A scenario fixes a rule set, a subtotal and the cart's starting fee lines, then runs a
//! sequence of recalculation steps, each with its own enabled flag and selection sources
//! and the fee lines expected afterwards.

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    fees::{FeeLine, FeeSource},
    fixtures::{FixtureError, parse_price},
    methods::PaymentMethodId,
    recalculation::{self, RecalculationInput},
    rules::RuleSet,
    selection::SelectionSources,
};

/// A recalculation scenario
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Human description
    pub description: String,

    /// Configured rules
    #[serde(default)]
    pub rules: RuleSet,

    /// Cart subtotal (e.g. "100.00 GBP")
    pub subtotal: String,

    /// Fee lines present before the first step
    #[serde(default)]
    pub fees: Vec<FeeFixture>,

    /// Recalculation passes, run in order
    pub steps: Vec<StepFixture>,
}

/// Fee line in YAML
#[derive(Debug, Clone, Deserialize)]
pub struct FeeFixture {
    /// Fee line name
    pub name: String,

    /// Amount (e.g. "-10.00 GBP")
    pub amount: String,

    /// Origin of the line
    #[serde(default = "host_source")]
    pub source: FeeSource,
}

const fn host_source() -> FeeSource {
    FeeSource::Host
}

/// Session values in YAML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionFixture {
    /// Session "selected" key
    pub selected: Option<PaymentMethodId>,

    /// Session "chosen" key
    pub chosen: Option<PaymentMethodId>,
}

/// One recalculation pass
#[derive(Debug, Clone, Deserialize)]
pub struct StepFixture {
    /// Enabled flag for this pass
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    /// Session values
    #[serde(default)]
    pub session: SessionFixture,

    /// Payment method submitted with the request
    #[serde(default)]
    pub submitted: Option<PaymentMethodId>,

    /// Method the pass should resolve as selected
    #[serde(default)]
    pub expect_selected: Option<PaymentMethodId>,

    /// Fee lines expected after the pass
    pub expect_fees: Vec<FeeFixture>,
}

const fn enabled_by_default() -> bool {
    true
}

/// Expected and actual state after one step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult<'a> {
    /// Method the step expected to be selected
    pub expected_selected: Option<PaymentMethodId>,

    /// Method the step resolved as selected
    pub actual_selected: Option<PaymentMethodId>,

    /// Fee lines the step expected
    pub expected_fees: Vec<FeeLine<'a>>,

    /// Fee lines after the step
    pub actual_fees: Vec<FeeLine<'a>>,
}

impl FeeFixture {
    fn to_fee_line(&self, currency: &Currency) -> Result<FeeLine<'static>, FixtureError> {
        let amount = parse_price(&self.amount)?;

        if amount.currency() != currency {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                amount.currency().iso_alpha_code.to_string(),
            ));
        }

        Ok(FeeLine {
            name: self.name.clone(),
            amount,
            source: self.source,
        })
    }
}

impl Scenario {
    /// Parsed subtotal
    ///
    /// # Errors
    ///
    /// Returns an error if the subtotal is not a valid price.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, FixtureError> {
        parse_price(&self.subtotal)
    }

    /// Run every step, feeding each step's fee lines into the next.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be parsed, currencies disagree, or a
    /// discount cannot be calculated.
    pub fn replay(&self) -> Result<Vec<StepResult<'static>>, FixtureError> {
        let subtotal = self.subtotal()?;
        let currency = subtotal.currency();

        let mut fees = fee_lines(&self.fees, currency)?;
        let mut results = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let sources = SelectionSources {
                session_selected: step.session.selected.clone(),
                submitted: step.submitted.clone(),
                session_chosen: step.session.chosen.clone(),
            };

            let outcome = recalculation::recalculate(RecalculationInput {
                enabled: step.enabled,
                rules: &self.rules,
                sources: &sources,
                subtotal: subtotal.clone(),
                fees,
            })?;

            fees = outcome.fees.clone();

            results.push(StepResult {
                expected_selected: step.expect_selected.clone(),
                actual_selected: outcome.selected,
                expected_fees: fee_lines(&step.expect_fees, currency)?,
                actual_fees: outcome.fees,
            });
        }

        Ok(results)
    }
}

fn fee_lines(
    fixtures: &[FeeFixture],
    currency: &Currency,
) -> Result<Vec<FeeLine<'static>>, FixtureError> {
    fixtures
        .iter()
        .map(|fixture| fixture.to_fee_line(currency))
        .collect()
}
