//! Tender
//!
//! Tender prices a checkout by the payment method the shopper selects: a percentage or
//! fixed-amount discount per payment method, applied as a single negative fee line.
//!
//! The crate is pure. Storage, sessions and transport live in `tender-app` and
//! `tender-json`; everything here is a function of the values passed in.

pub mod discounts;
pub mod fees;
pub mod fixtures;
pub mod methods;
pub mod recalculation;
pub mod rules;
pub mod selection;
pub mod tracker;
