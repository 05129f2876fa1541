//! Gateways service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::gateways::{
        errors::GatewaysServiceError,
        models::{Gateway, NewGateway},
        repository::PgGatewaysRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgGatewaysService {
    db: Db,
    repository: PgGatewaysRepository,
}

impl PgGatewaysService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgGatewaysRepository::new(),
        }
    }
}

#[async_trait]
impl GatewaysService for PgGatewaysService {
    async fn list_available(&self) -> Result<Vec<Gateway>, GatewaysServiceError> {
        let mut tx = self.db.begin().await?;

        let gateways = self.repository.list_available(&mut tx).await?;

        tx.commit().await?;

        Ok(gateways)
    }

    async fn save_gateway(&self, gateway: NewGateway) -> Result<Gateway, GatewaysServiceError> {
        if gateway.title.trim().is_empty() {
            return Err(GatewaysServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let saved = self.repository.upsert_gateway(&mut tx, gateway).await?;

        tx.commit().await?;

        Ok(saved)
    }
}

#[automock]
#[async_trait]
pub trait GatewaysService: Send + Sync {
    /// Enabled gateways in display order.
    async fn list_available(&self) -> Result<Vec<Gateway>, GatewaysServiceError>;

    /// Register a gateway, or update the one with the same id.
    async fn save_gateway(&self, gateway: NewGateway) -> Result<Gateway, GatewaysServiceError>;
}

#[cfg(test)]
mod tests {
    use tender::methods::PaymentMethodId;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn new_gateway(id: &str, title: &str, enabled: bool, position: i32) -> NewGateway {
        NewGateway {
            id: PaymentMethodId::parse(id).unwrap_or_else(|| unreachable!("fixture ids are non-empty")),
            title: title.to_string(),
            enabled,
            position,
        }
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL testcontainer"]
    async fn list_available_skips_disabled_and_orders_by_position() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.gateways
            .save_gateway(new_gateway("cod", "Cash on delivery", true, 2))
            .await?;
        ctx.gateways
            .save_gateway(new_gateway("bacs", "Direct bank transfer", true, 1))
            .await?;
        ctx.gateways
            .save_gateway(new_gateway("cheque", "Cheque", false, 0))
            .await?;

        let ids: Vec<String> = ctx
            .gateways
            .list_available()
            .await?
            .into_iter()
            .map(|gateway| gateway.id.to_string())
            .collect();

        assert_eq!(ids, vec!["bacs", "cod"]);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL testcontainer"]
    async fn save_gateway_updates_existing_id() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.gateways
            .save_gateway(new_gateway("bacs", "Bank", true, 0))
            .await?;

        let updated = ctx
            .gateways
            .save_gateway(new_gateway("bacs", "Direct bank transfer", true, 3))
            .await?;

        assert_eq!(updated.title, "Direct bank transfer");
        assert_eq!(ctx.gateways.list_available().await?, vec![updated]);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL testcontainer"]
    async fn save_gateway_rejects_blank_title() {
        let ctx = TestContext::new().await;

        let result = ctx
            .gateways
            .save_gateway(new_gateway("bacs", "  ", true, 0))
            .await;

        assert!(
            matches!(result, Err(GatewaysServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }
}
