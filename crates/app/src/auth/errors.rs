//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{auth::ApiTokenError, domain::errors::StorageFailure};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("token not found")]
    NotFound,

    #[error("administrator already exists")]
    AlreadyExists,

    #[error("administrator not found")]
    UnknownAdmin,

    #[error("administrator name cannot be blank")]
    InvalidName,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("token processing error")]
    Token(#[source] ApiTokenError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        match StorageFailure::from(error) {
            StorageFailure::InvalidReference => Self::UnknownAdmin,
            StorageFailure::InvalidData | StorageFailure::MissingRequiredData => Self::InvalidName,
            StorageFailure::AlreadyExists => Self::AlreadyExists,
            StorageFailure::NotFound => Self::NotFound,
            StorageFailure::Other(error) => Self::Sql(error),
        }
    }
}

impl From<ApiTokenError> for AuthServiceError {
    fn from(error: ApiTokenError) -> Self {
        Self::Token(error)
    }
}
