//! Settings service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsServiceError {
    #[error("storage error")]
    Sql(#[from] Error),

    #[error("settings could not be encoded")]
    Encoding(#[from] serde_json::Error),
}
