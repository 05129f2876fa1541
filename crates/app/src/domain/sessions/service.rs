//! Sessions service.

use async_trait::async_trait;
use mockall::automock;
use tender::{
    methods::PaymentMethodId,
    selection::{
        CHOSEN_METHOD_KEY, SELECTED_METHOD_KEY, SUBMITTED_MARKER_KEY, SelectionSource,
        WriteDecision,
    },
};
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        carts::models::CartUuid,
        sessions::{
            errors::SessionsServiceError,
            models::{SUBMITTED_MARKER_VALUE, SelectionWrite, SessionSelection},
            repository::PgSessionsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgSessionsService {
    db: Db,
    repository: PgSessionsRepository,
}

impl PgSessionsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgSessionsRepository::new(),
        }
    }
}

#[async_trait]
impl SessionsService for PgSessionsService {
    async fn get_selection(&self, cart: CartUuid) -> Result<SessionSelection, SessionsServiceError> {
        let mut tx = self.db.begin().await?;

        let values = self.repository.get_values(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(SessionSelection::from_values(&values))
    }

    async fn write_selection(
        &self,
        cart: CartUuid,
        method: PaymentMethodId,
        source: SelectionSource,
    ) -> Result<SelectionWrite, SessionsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.lock_cart(&mut tx, cart).await?;

        let before = SessionSelection::from_values(&self.repository.get_values(&mut tx, cart).await?);

        let WriteDecision::Apply { submitted } = source.decide(before.submitted) else {
            debug!(%cart, %method, ?source, "ignoring selection after submission");

            tx.commit().await?;

            return Ok(SelectionWrite {
                before,
                applied: false,
            });
        };

        for key in [SELECTED_METHOD_KEY, CHOSEN_METHOD_KEY] {
            self.repository
                .set_value(&mut tx, cart, key, method.as_str())
                .await?;
        }

        if submitted {
            self.repository
                .set_value(&mut tx, cart, SUBMITTED_MARKER_KEY, SUBMITTED_MARKER_VALUE)
                .await?;
        } else if before.submitted {
            self.repository
                .delete_value(&mut tx, cart, SUBMITTED_MARKER_KEY)
                .await?;
        }

        tx.commit().await?;

        Ok(SelectionWrite {
            before,
            applied: true,
        })
    }
}

#[automock]
#[async_trait]
pub trait SessionsService: Send + Sync {
    /// Current session selection for the cart; empty when nothing was written yet.
    async fn get_selection(&self, cart: CartUuid) -> Result<SessionSelection, SessionsServiceError>;

    /// Record a payment method selection from the given source.
    ///
    /// Both session keys are written together. Background notifications arriving after a
    /// submission are ignored and reported as not applied.
    async fn write_selection(
        &self,
        cart: CartUuid,
        method: PaymentMethodId,
        source: SelectionSource,
    ) -> Result<SelectionWrite, SessionsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::carts::{CartsService, models::NewCart},
        test::TestContext,
    };

    use super::*;

    fn method(id: &str) -> PaymentMethodId {
        PaymentMethodId::parse(id).unwrap_or_else(|| unreachable!("fixture ids are non-empty"))
    }

    async fn new_cart(ctx: &TestContext) -> Result<CartUuid, Box<dyn std::error::Error>> {
        let uuid = CartUuid::new();

        ctx.carts
            .create_cart(NewCart {
                uuid,
                subtotal: 100_00,
            })
            .await?;

        Ok(uuid)
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL testcontainer"]
    async fn empty_session_has_no_selection() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = new_cart(&ctx).await?;

        assert_eq!(
            ctx.sessions.get_selection(cart).await?,
            SessionSelection::default()
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL testcontainer"]
    async fn notification_writes_both_keys() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = new_cart(&ctx).await?;

        let first = ctx
            .sessions
            .write_selection(cart, method("bacs"), SelectionSource::Notification)
            .await?;

        assert!(first.applied);
        assert_eq!(first.before, SessionSelection::default());

        let second = ctx
            .sessions
            .write_selection(cart, method("cod"), SelectionSource::Notification)
            .await?;

        assert_eq!(second.before.selected, Some(method("bacs")));

        let selection = ctx.sessions.get_selection(cart).await?;

        assert_eq!(selection.selected, Some(method("cod")));
        assert_eq!(selection.chosen, Some(method("cod")));
        assert!(!selection.submitted);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL testcontainer"]
    async fn late_notification_after_submission_is_ignored() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = new_cart(&ctx).await?;

        ctx.sessions
            .write_selection(cart, method("bacs"), SelectionSource::Submission)
            .await?;

        let late = ctx
            .sessions
            .write_selection(cart, method("cod"), SelectionSource::Notification)
            .await?;

        assert!(!late.applied);

        let selection = ctx.sessions.get_selection(cart).await?;

        assert_eq!(selection.selected, Some(method("bacs")));
        assert!(selection.submitted);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL testcontainer"]
    async fn order_review_clears_submission_marker() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = new_cart(&ctx).await?;

        ctx.sessions
            .write_selection(cart, method("bacs"), SelectionSource::Submission)
            .await?;

        let review = ctx
            .sessions
            .write_selection(cart, method("cheque"), SelectionSource::OrderReview)
            .await?;

        assert!(review.applied);

        let selection = ctx.sessions.get_selection(cart).await?;

        assert_eq!(selection.selected, Some(method("cheque")));
        assert!(!selection.submitted);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL testcontainer"]
    async fn write_for_unknown_cart_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .sessions
            .write_selection(CartUuid::new(), method("bacs"), SelectionSource::Notification)
            .await;

        assert!(
            matches!(result, Err(SessionsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
