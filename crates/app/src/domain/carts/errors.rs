//! Carts service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::errors::StorageFailure;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart already exists")]
    AlreadyExists,

    #[error("cart not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        match StorageFailure::from(error) {
            StorageFailure::NotFound => Self::NotFound,
            StorageFailure::AlreadyExists => Self::AlreadyExists,
            StorageFailure::InvalidReference => Self::InvalidReference,
            StorageFailure::MissingRequiredData => Self::MissingRequiredData,
            StorageFailure::InvalidData => Self::InvalidData,
            StorageFailure::Other(error) => Self::Sql(error),
        }
    }
}
