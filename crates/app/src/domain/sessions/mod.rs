//! Checkout Sessions

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::SessionsServiceError;
pub use service::*;
