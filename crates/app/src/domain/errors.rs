//! Storage error classification shared by the domain services.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};

/// What a failed statement means to a service.
#[derive(Debug)]
pub(crate) enum StorageFailure {
    NotFound,
    AlreadyExists,
    InvalidReference,
    MissingRequiredData,
    InvalidData,
    Other(Error),
}

impl From<Error> for StorageFailure {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Other(error),
        }
    }
}
