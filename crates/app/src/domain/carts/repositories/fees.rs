//! Cart Fees Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use tender::fees::FeeSource;

use crate::domain::carts::models::{CartFee, CartFeeUuid, CartUuid, NewCartFee};

const GET_CART_FEES_SQL: &str = include_str!("../sql/get_cart_fees.sql");
const CREATE_CART_FEE_SQL: &str = include_str!("../sql/create_cart_fee.sql");
const DELETE_DISCOUNT_FEES_SQL: &str = include_str!("../sql/delete_discount_fees.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartFeesRepository;

impl PgCartFeesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_fees(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartFee>, sqlx::Error> {
        query_as::<Postgres, CartFee>(GET_CART_FEES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_cart_fee(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        fee: NewCartFee,
    ) -> Result<CartFee, sqlx::Error> {
        query_as::<Postgres, CartFee>(CREATE_CART_FEE_SQL)
            .bind(fee.uuid.into_uuid())
            .bind(cart.into_uuid())
            .bind(fee.name)
            .bind(fee.amount)
            .bind(fee.source.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Delete the cart's payment-method discount lines: marked rows, plus unmarked rows
    /// named after a known discount label.
    pub(crate) async fn delete_discount_fees(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        labels: &[String],
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_DISCOUNT_FEES_SQL)
            .bind(cart.into_uuid())
            .bind(labels)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartFee {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let source: String = row.try_get("source")?;

        Ok(Self {
            uuid: CartFeeUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            amount: row.try_get("amount")?,
            source: FeeSource::from_stored(&source),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
