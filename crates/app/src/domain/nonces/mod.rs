//! Anti-forgery Nonces

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::NoncesServiceError;
pub use service::*;
