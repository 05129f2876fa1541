//! Options Repository

use serde_json::Value;
use sqlx::{Postgres, Transaction, query, query_scalar};

const GET_OPTION_SQL: &str = include_str!("sql/get_option.sql");
const SET_OPTION_SQL: &str = include_str!("sql/set_option.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOptionsRepository;

impl PgOptionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_option(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: &str,
    ) -> Result<Option<Value>, sqlx::Error> {
        query_scalar::<Postgres, Value>(GET_OPTION_SQL)
            .bind(key)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn set_option(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: &str,
        value: Value,
    ) -> Result<(), sqlx::Error> {
        query(SET_OPTION_SQL)
            .bind(key)
            .bind(value)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
