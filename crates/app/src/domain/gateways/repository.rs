//! Gateways Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use tender::methods::PaymentMethodId;

use crate::domain::gateways::models::{Gateway, NewGateway};

const LIST_AVAILABLE_GATEWAYS_SQL: &str = include_str!("sql/list_available_gateways.sql");
const UPSERT_GATEWAY_SQL: &str = include_str!("sql/upsert_gateway.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgGatewaysRepository;

impl PgGatewaysRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_available(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Gateway>, sqlx::Error> {
        query_as::<Postgres, Gateway>(LIST_AVAILABLE_GATEWAYS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_gateway(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        gateway: NewGateway,
    ) -> Result<Gateway, sqlx::Error> {
        query_as::<Postgres, Gateway>(UPSERT_GATEWAY_SQL)
            .bind(gateway.id.as_str())
            .bind(gateway.title)
            .bind(gateway.enabled)
            .bind(gateway.position)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Gateway {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let id: String = row.try_get("id")?;

        Ok(Self {
            id: PaymentMethodId::parse(&id).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "id".to_string(),
                source: "blank payment gateway id".into(),
            })?,
            title: row.try_get("title")?,
            enabled: row.try_get("enabled")?,
            position: row.try_get("position")?,
        })
    }
}
