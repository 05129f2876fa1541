//! Fixtures

use std::{fs, path::PathBuf};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::discounts::{self, DiscountError};

pub mod scenarios;

pub use scenarios::{Scenario, StepResult};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between amounts
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Discount calculation failed while replaying
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Loads scenario fixtures from disk.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a fixture loader with the default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a fixture loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load a single scenario by file stem
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn scenario(&self, name: &str) -> Result<Scenario, FixtureError> {
        let file_path = self.base_path.join("scenarios").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }

    /// Load every scenario in the scenarios directory, ordered by file name
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or any scenario cannot be read or parsed.
    pub fn scenarios(&self) -> Result<Vec<(String, Scenario)>, FixtureError> {
        let mut paths = fs::read_dir(self.base_path.join("scenarios"))?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()?;

        paths.retain(|path| path.extension().is_some_and(|ext| ext == "yml"));
        paths.sort();

        paths
            .into_iter()
            .map(|path| {
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();

                let contents = fs::read_to_string(&path)?;

                Ok((name, serde_norway::from_str(&contents)?))
            })
            .collect()
    }
}

/// Parse a price string (e.g. `"2.99 GBP"` or `"-10.00 GBP"`) into money
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount
/// is not a decimal, or if the currency code is not recognised.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = rusty_money::iso::find(code)
        .ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))?;

    let minor_units = discounts::major_to_minor(amount, currency)
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}
