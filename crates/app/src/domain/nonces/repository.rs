//! Nonces Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Postgres, Transaction, query, query_scalar};
use uuid::Uuid;

use crate::domain::nonces::models::NonceAction;

const CREATE_NONCE_SQL: &str = include_str!("sql/create_nonce.sql");
const FIND_NONCE_SQL: &str = include_str!("sql/find_nonce.sql");
const DELETE_EXPIRED_NONCES_SQL: &str = include_str!("sql/delete_expired_nonces.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgNoncesRepository;

impl PgNoncesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_nonce(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token_hash: &str,
        action: NonceAction,
        subject: Uuid,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_NONCE_SQL)
            .bind(token_hash)
            .bind(action.as_str())
            .bind(subject)
            .bind(SqlxTimestamp::from(expires_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Whether an unexpired nonce with this hash exists for the action and subject.
    pub(crate) async fn nonce_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token_hash: &str,
        action: NonceAction,
        subject: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let found = query_scalar::<Postgres, String>(FIND_NONCE_SQL)
            .bind(token_hash)
            .bind(action.as_str())
            .bind(subject)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(found.is_some())
    }

    pub(crate) async fn delete_expired(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_EXPIRED_NONCES_SQL)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
