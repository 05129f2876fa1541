//! Nonces service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoncesServiceError {
    #[error("nonce is missing, expired or was issued for another request")]
    Invalid,

    #[error("nonce lifetime overflows the timestamp range")]
    Lifetime(#[source] jiff::Error),

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
