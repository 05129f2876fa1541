//! Sessions service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::errors::StorageFailure;

#[derive(Debug, Error)]
pub enum SessionsServiceError {
    #[error("cart not found")]
    NotFound,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SessionsServiceError {
    fn from(error: Error) -> Self {
        match StorageFailure::from(error) {
            StorageFailure::NotFound | StorageFailure::InvalidReference => Self::NotFound,
            StorageFailure::AlreadyExists
            | StorageFailure::MissingRequiredData
            | StorageFailure::InvalidData => Self::InvalidData,
            StorageFailure::Other(error) => Self::Sql(error),
        }
    }
}
