//! Gateways service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::errors::StorageFailure;

#[derive(Debug, Error)]
pub enum GatewaysServiceError {
    #[error("gateway already exists")]
    AlreadyExists,

    #[error("gateway not found")]
    NotFound,

    #[error("invalid gateway data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for GatewaysServiceError {
    fn from(error: Error) -> Self {
        match StorageFailure::from(error) {
            StorageFailure::NotFound => Self::NotFound,
            StorageFailure::AlreadyExists => Self::AlreadyExists,
            StorageFailure::InvalidReference
            | StorageFailure::MissingRequiredData
            | StorageFailure::InvalidData => Self::InvalidData,
            StorageFailure::Other(error) => Self::Sql(error),
        }
    }
}
