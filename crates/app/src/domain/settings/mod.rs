//! Discount Settings

pub mod errors;
pub mod form;
pub mod models;
mod repository;
pub mod service;

pub use errors::SettingsServiceError;
pub use service::*;
