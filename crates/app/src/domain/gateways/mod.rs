//! Payment Gateway Registry

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::GatewaysServiceError;
pub use service::*;
