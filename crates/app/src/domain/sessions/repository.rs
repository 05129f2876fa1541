//! Sessions Repository

use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::carts::models::CartUuid;

const LOCK_CART_SQL: &str = include_str!("sql/lock_cart.sql");
const GET_SESSION_VALUES_SQL: &str = include_str!("sql/get_session_values.sql");
const SET_SESSION_VALUE_SQL: &str = include_str!("sql/set_session_value.sql");
const DELETE_SESSION_VALUE_SQL: &str = include_str!("sql/delete_session_value.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSessionsRepository;

impl PgSessionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lock the owning cart so concurrent selection writes serialise.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<(), sqlx::Error> {
        query_scalar::<Postgres, Uuid>(LOCK_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_one(&mut **tx)
            .await
            .map(|_uuid| ())
    }

    pub(crate) async fn get_values(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<FxHashMap<String, String>, sqlx::Error> {
        let rows = query_as::<Postgres, (String, String)>(GET_SESSION_VALUES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().collect())
    }

    pub(crate) async fn set_value(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        key: &str,
        value: &str,
    ) -> Result<(), sqlx::Error> {
        query(SET_SESSION_VALUE_SQL)
            .bind(cart.into_uuid())
            .bind(key)
            .bind(value)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_value(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        key: &str,
    ) -> Result<(), sqlx::Error> {
        query(DELETE_SESSION_VALUE_SQL)
            .bind(cart.into_uuid())
            .bind(key)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
