//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rusty_money::iso::Currency;
use tender::{
    discounts,
    fees::FeeLine,
    methods::PaymentMethodId,
    recalculation::{self, RecalculationInput},
    selection::{NotificationOutcome, SelectionSource},
};
use tracing::{debug, info};

use crate::domain::{
    carts::{
        CartsService,
        models::{CartUuid, DiscountLineUpdate, NewCartFee},
    },
    checkout::{
        errors::CheckoutServiceError,
        models::{
            AppliedDiscount, AvailableDiscount, CheckoutTotals, OrderReviewFields, SelectionNotice,
        },
    },
    gateways::GatewaysService,
    sessions::SessionsService,
    settings::SettingsService,
};

/// Checkout flow built from the settings, gateway, session and cart services.
#[derive(Clone)]
pub struct StoreCheckoutService {
    settings: Arc<dyn SettingsService>,
    gateways: Arc<dyn GatewaysService>,
    sessions: Arc<dyn SessionsService>,
    carts: Arc<dyn CartsService>,
    currency: &'static Currency,
}

impl std::fmt::Debug for StoreCheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCheckoutService")
            .field("currency", &self.currency.iso_alpha_code)
            .finish_non_exhaustive()
    }
}

impl StoreCheckoutService {
    #[must_use]
    pub fn new(
        settings: Arc<dyn SettingsService>,
        gateways: Arc<dyn GatewaysService>,
        sessions: Arc<dyn SessionsService>,
        carts: Arc<dyn CartsService>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            settings,
            gateways,
            sessions,
            carts,
            currency,
        }
    }

    /// Run the pricing pipeline for the cart, writing the discount line only when the fee
    /// collection changed.
    async fn recalculate_with(
        &self,
        cart: CartUuid,
        submitted: Option<PaymentMethodId>,
    ) -> Result<CheckoutTotals, CheckoutServiceError> {
        let settings = self.settings.get_settings().await?;
        let mut record = self.carts.get_cart(cart).await?;
        let selection = self.sessions.get_selection(cart).await?;
        let sources = selection.sources(submitted);

        let before = record.fee_lines(self.currency);

        let result = recalculation::recalculate(RecalculationInput {
            enabled: settings.enabled,
            rules: &settings.rules,
            sources: &sources,
            subtotal: record.subtotal_money(self.currency),
            fees: before.clone(),
        })?;

        if result.changed_from(&before) {
            let update = DiscountLineUpdate {
                labels: result.labels.sorted().into_iter().map(str::to_string).collect(),
                discount: result
                    .discount
                    .clone()
                    .map(|discount| NewCartFee::from(&FeeLine::from(discount))),
            };

            record.fees = self.carts.apply_discount(cart, update).await?;

            info!(
                %cart,
                selected = ?result.selected.as_ref().map(PaymentMethodId::as_str),
                removed = result.removed,
                applied = result.discount.is_some(),
                "reconciled payment method discount"
            );
        }

        let discount = result.discount.map(|discount| AppliedDiscount {
            payment_method: discount.method,
            label: discount.label,
            amount: discount.amount.to_minor_units(),
        });

        Ok(CheckoutTotals::new(&record, result.selected, discount))
    }
}

#[async_trait]
impl CheckoutService for StoreCheckoutService {
    async fn notify_selection(
        &self,
        cart: CartUuid,
        method: PaymentMethodId,
    ) -> Result<SelectionNotice, CheckoutServiceError> {
        let settings = self.settings.get_settings().await?;

        let write = self
            .sessions
            .write_selection(cart, method.clone(), SelectionSource::Notification)
            .await?;

        if write.applied {
            let outcome = NotificationOutcome::evaluate(
                &settings.rules,
                write.before.selected.as_ref(),
                &method,
            );

            debug!(%cart, %method, ?outcome, "recorded payment method selection");

            return Ok(SelectionNotice {
                payment_method: method,
                accepted: true,
                outcome,
            });
        }

        let outcome =
            NotificationOutcome::ignored(&settings.rules, write.before.selected.as_ref(), &method);

        debug!(%cart, %method, ?outcome, "ignored selection after checkout submission");

        Ok(SelectionNotice {
            payment_method: write.before.selected.unwrap_or(method),
            accepted: false,
            outcome,
        })
    }

    async fn update_order_review(
        &self,
        cart: CartUuid,
        post_data: &str,
    ) -> Result<CheckoutTotals, CheckoutServiceError> {
        let method = OrderReviewFields::parse(post_data).method();

        if let Some(method) = method.clone() {
            self.sessions
                .write_selection(cart, method, SelectionSource::OrderReview)
                .await?;
        }

        self.recalculate_with(cart, method).await
    }

    async fn submit(
        &self,
        cart: CartUuid,
        method: Option<PaymentMethodId>,
    ) -> Result<CheckoutTotals, CheckoutServiceError> {
        if let Some(method) = method.clone() {
            self.sessions
                .write_selection(cart, method, SelectionSource::Submission)
                .await?;
        }

        self.recalculate_with(cart, method).await
    }

    async fn recalculate(&self, cart: CartUuid) -> Result<CheckoutTotals, CheckoutServiceError> {
        self.recalculate_with(cart, None).await
    }

    async fn available_discounts(
        &self,
        cart: CartUuid,
    ) -> Result<Vec<AvailableDiscount>, CheckoutServiceError> {
        self.carts.get_cart(cart).await?;

        let settings = self.settings.get_settings().await?;

        if !settings.enabled {
            return Ok(Vec::new());
        }

        let gateways = self.gateways.list_available().await?;
        let mut available = Vec::new();

        for gateway in gateways {
            let Some(rule) = settings.rules.active_rule(gateway.id.as_str()) else {
                continue;
            };

            let label = rule
                .label
                .clone()
                .unwrap_or_else(|| format!("{} Discount", gateway.title));

            available.push(AvailableDiscount {
                summary: discounts::describe(rule, self.currency)?,
                payment_method: gateway.id,
                title: gateway.title,
                label,
            });
        }

        Ok(available)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Record the storefront's background selection notification.
    async fn notify_selection(
        &self,
        cart: CartUuid,
        method: PaymentMethodId,
    ) -> Result<SelectionNotice, CheckoutServiceError>;

    /// Handle the checkout's url-encoded order review payload, then recalculate.
    async fn update_order_review(
        &self,
        cart: CartUuid,
        post_data: &str,
    ) -> Result<CheckoutTotals, CheckoutServiceError>;

    /// Handle the final checkout submission, then recalculate.
    async fn submit(
        &self,
        cart: CartUuid,
        method: Option<PaymentMethodId>,
    ) -> Result<CheckoutTotals, CheckoutServiceError>;

    /// Recalculate the cart from the session selection alone.
    async fn recalculate(&self, cart: CartUuid) -> Result<CheckoutTotals, CheckoutServiceError>;

    /// Discounts on offer for the gateways currently available.
    async fn available_discounts(
        &self,
        cart: CartUuid,
    ) -> Result<Vec<AvailableDiscount>, CheckoutServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::GBP};
    use tender::{
        fees::FeeSource,
        rules::{DiscountKind, DiscountRule, RuleSet},
    };
    use testresult::TestResult;

    use crate::domain::{
        carts::{
            CartsServiceError, MockCartsService,
            models::{Cart, CartFee, CartFeeUuid},
        },
        gateways::{MockGatewaysService, models::Gateway},
        sessions::{
            MockSessionsService, SessionsServiceError,
            models::{SelectionWrite, SessionSelection},
        },
        settings::{MockSettingsService, models::DiscountSettings},
    };

    use super::*;

    fn method(id: &str) -> PaymentMethodId {
        PaymentMethodId::parse(id).unwrap_or_else(|| unreachable!("fixture ids are non-empty"))
    }

    fn settings(enabled: bool) -> DiscountSettings {
        let rules: RuleSet = [
            (
                method("bacs"),
                DiscountRule::new(
                    DiscountKind::Percentage,
                    Decimal::from(10),
                    Some("Bank Transfer Discount"),
                ),
            ),
            (
                method("cod"),
                DiscountRule::new(DiscountKind::Fixed, Decimal::from(20), None),
            ),
        ]
        .into_iter()
        .collect();

        DiscountSettings { enabled, rules }
    }

    fn fee(name: &str, amount: i64, source: FeeSource) -> CartFee {
        CartFee {
            uuid: CartFeeUuid::new(),
            name: name.to_string(),
            amount,
            source,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn cart(uuid: CartUuid, subtotal: i64, fees: Vec<CartFee>) -> Cart {
        Cart {
            uuid,
            subtotal,
            fees,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }

    fn selection(selected: Option<&str>, submitted: bool) -> SessionSelection {
        SessionSelection {
            selected: selected.map(method),
            chosen: selected.map(method),
            submitted,
        }
    }

    fn settings_service(enabled: bool) -> MockSettingsService {
        let mut service = MockSettingsService::new();

        service
            .expect_get_settings()
            .returning(move || Ok(settings(enabled)));

        service
    }

    fn checkout(
        settings: MockSettingsService,
        gateways: MockGatewaysService,
        sessions: MockSessionsService,
        carts: MockCartsService,
    ) -> StoreCheckoutService {
        StoreCheckoutService::new(
            Arc::new(settings),
            Arc::new(gateways),
            Arc::new(sessions),
            Arc::new(carts),
            GBP,
        )
    }

    /// Stored fees after a discount update: `kept` followed by the new discount line.
    fn applied(kept: Vec<CartFee>, update: DiscountLineUpdate) -> Vec<CartFee> {
        kept.into_iter()
            .chain(update.discount.map(|fee| CartFee {
                uuid: fee.uuid,
                name: fee.name,
                amount: fee.amount,
                source: fee.source,
                created_at: Timestamp::UNIX_EPOCH,
            }))
            .collect()
    }

    #[tokio::test]
    async fn notify_selection_reports_switch_to_discounted_method() -> TestResult {
        let uuid = CartUuid::new();
        let mut sessions = MockSessionsService::new();

        sessions
            .expect_write_selection()
            .once()
            .withf(move |cart, method, source| {
                *cart == uuid && method.as_str() == "bacs" && *source == SelectionSource::Notification
            })
            .return_once(|_, _, _| {
                Ok(SelectionWrite {
                    before: selection(Some("cheque"), false),
                    applied: true,
                })
            });

        let service = checkout(
            settings_service(true),
            MockGatewaysService::new(),
            sessions,
            MockCartsService::new(),
        );

        let notice = service.notify_selection(uuid, method("bacs")).await?;

        assert!(notice.accepted);
        assert_eq!(notice.payment_method, method("bacs"));
        assert!(notice.outcome.discount_applied);
        assert!(notice.outcome.has_discount);
        assert!(!notice.outcome.previous_had_discount);

        Ok(())
    }

    #[tokio::test]
    async fn notify_selection_after_submission_reports_held_method_and_requests_refresh()
    -> TestResult {
        let uuid = CartUuid::new();
        let mut sessions = MockSessionsService::new();

        sessions.expect_write_selection().once().return_once(|_, _, _| {
            Ok(SelectionWrite {
                before: selection(Some("bacs"), true),
                applied: false,
            })
        });

        let service = checkout(
            settings_service(true),
            MockGatewaysService::new(),
            sessions,
            MockCartsService::new(),
        );

        let notice = service.notify_selection(uuid, method("cheque")).await?;

        assert!(!notice.accepted);
        assert_eq!(notice.payment_method, method("bacs"));
        assert!(notice.outcome.discount_applied);
        assert!(notice.outcome.has_discount);

        Ok(())
    }

    #[tokio::test]
    async fn notify_selection_repeating_submitted_method_needs_no_refresh() -> TestResult {
        let mut sessions = MockSessionsService::new();

        sessions.expect_write_selection().once().return_once(|_, _, _| {
            Ok(SelectionWrite {
                before: selection(Some("bacs"), true),
                applied: false,
            })
        });

        let service = checkout(
            settings_service(true),
            MockGatewaysService::new(),
            sessions,
            MockCartsService::new(),
        );

        let notice = service.notify_selection(CartUuid::new(), method("bacs")).await?;

        assert!(!notice.accepted);
        assert!(!notice.outcome.discount_applied);

        Ok(())
    }

    #[tokio::test]
    async fn notify_selection_for_unknown_cart_is_not_found() {
        let mut sessions = MockSessionsService::new();

        sessions
            .expect_write_selection()
            .once()
            .return_once(|_, _, _| Err(SessionsServiceError::NotFound));

        let service = checkout(
            settings_service(true),
            MockGatewaysService::new(),
            sessions,
            MockCartsService::new(),
        );

        let result = service.notify_selection(CartUuid::new(), method("bacs")).await;

        assert!(
            matches!(result, Err(CheckoutServiceError::CartNotFound)),
            "expected CartNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn recalculate_adds_discount_line() -> TestResult {
        let uuid = CartUuid::new();
        let mut sessions = MockSessionsService::new();
        let mut carts = MockCartsService::new();

        sessions
            .expect_get_selection()
            .once()
            .return_once(|_| Ok(selection(Some("bacs"), false)));

        carts
            .expect_get_cart()
            .once()
            .return_once(move |_| Ok(cart(uuid, 100_00, vec![fee("Gift wrap", 3_00, FeeSource::Host)])));

        carts
            .expect_apply_discount()
            .once()
            .withf(move |cart, update| {
                *cart == uuid
                    && update.labels.iter().any(|label| label == "Bank Transfer Discount")
                    && update.discount.as_ref().is_some_and(|fee| {
                        fee.name == "Bank Transfer Discount"
                            && fee.amount == -10_00
                            && fee.source == FeeSource::PaymentMethodDiscount
                    })
            })
            .return_once(|_, update| {
                Ok(applied(vec![fee("Gift wrap", 3_00, FeeSource::Host)], update))
            });

        let service = checkout(settings_service(true), MockGatewaysService::new(), sessions, carts);

        let totals = service.recalculate(uuid).await?;

        assert_eq!(totals.selected_payment_method, Some(method("bacs")));
        assert_eq!(
            totals.discount.as_ref().map(|discount| discount.amount),
            Some(-10_00)
        );
        assert_eq!(totals.total, 93_00);

        Ok(())
    }

    #[tokio::test]
    async fn recalculate_leaves_unchanged_fees_alone() -> TestResult {
        let uuid = CartUuid::new();
        let mut sessions = MockSessionsService::new();
        let mut carts = MockCartsService::new();

        sessions
            .expect_get_selection()
            .once()
            .return_once(|_| Ok(selection(Some("bacs"), false)));

        carts.expect_get_cart().once().return_once(move |_| {
            Ok(cart(
                uuid,
                100_00,
                vec![fee(
                    "Bank Transfer Discount",
                    -10_00,
                    FeeSource::PaymentMethodDiscount,
                )],
            ))
        });

        carts.expect_apply_discount().never();

        let service = checkout(settings_service(true), MockGatewaysService::new(), sessions, carts);

        let totals = service.recalculate(uuid).await?;

        assert_eq!(totals.fees.len(), 1);
        assert_eq!(totals.total, 90_00);

        Ok(())
    }

    #[tokio::test]
    async fn recalculate_when_disabled_removes_discount_line() -> TestResult {
        let uuid = CartUuid::new();
        let mut sessions = MockSessionsService::new();
        let mut carts = MockCartsService::new();

        sessions
            .expect_get_selection()
            .once()
            .return_once(|_| Ok(selection(Some("bacs"), false)));

        carts.expect_get_cart().once().return_once(move |_| {
            Ok(cart(
                uuid,
                100_00,
                vec![
                    fee("Gift wrap", 3_00, FeeSource::Host),
                    fee(
                        "Bank Transfer Discount",
                        -10_00,
                        FeeSource::PaymentMethodDiscount,
                    ),
                ],
            ))
        });

        carts
            .expect_apply_discount()
            .once()
            .withf(|_, update| update.discount.is_none())
            .return_once(|_, update| {
                Ok(applied(vec![fee("Gift wrap", 3_00, FeeSource::Host)], update))
            });

        let service = checkout(settings_service(false), MockGatewaysService::new(), sessions, carts);

        let totals = service.recalculate(uuid).await?;

        assert!(totals.discount.is_none());
        assert_eq!(totals.total, 103_00);

        Ok(())
    }

    #[tokio::test]
    async fn recalculate_totals_include_fees_added_since_the_read() -> TestResult {
        let uuid = CartUuid::new();
        let mut sessions = MockSessionsService::new();
        let mut carts = MockCartsService::new();

        sessions
            .expect_get_selection()
            .once()
            .return_once(|_| Ok(selection(Some("bacs"), false)));

        carts
            .expect_get_cart()
            .once()
            .return_once(move |_| Ok(cart(uuid, 100_00, Vec::new())));

        // Gift wrap was added by another request after the cart was read.
        carts
            .expect_apply_discount()
            .once()
            .return_once(|_, update| {
                Ok(applied(vec![fee("Gift wrap", 3_00, FeeSource::Host)], update))
            });

        let service = checkout(settings_service(true), MockGatewaysService::new(), sessions, carts);

        let totals = service.recalculate(uuid).await?;

        assert_eq!(totals.fees.len(), 2);
        assert_eq!(totals.total, 93_00);

        Ok(())
    }

    #[tokio::test]
    async fn update_order_review_writes_selection_and_uses_request_value() -> TestResult {
        let uuid = CartUuid::new();
        let mut sessions = MockSessionsService::new();
        let mut carts = MockCartsService::new();

        sessions
            .expect_write_selection()
            .once()
            .withf(|_, method, source| {
                method.as_str() == "cod" && *source == SelectionSource::OrderReview
            })
            .return_once(|_, _, _| {
                Ok(SelectionWrite {
                    before: SessionSelection::default(),
                    applied: true,
                })
            });

        // The session read races the write; the request value still resolves.
        sessions
            .expect_get_selection()
            .once()
            .return_once(|_| Ok(SessionSelection::default()));

        carts
            .expect_get_cart()
            .once()
            .return_once(move |_| Ok(cart(uuid, 5_00, Vec::new())));

        carts
            .expect_apply_discount()
            .once()
            .return_once(|_, update| Ok(applied(Vec::new(), update)));

        let service = checkout(settings_service(true), MockGatewaysService::new(), sessions, carts);

        let totals = service
            .update_order_review(uuid, "billing_email=a%40b.c&payment_method=cod")
            .await?;

        let discount = totals.discount.ok_or("expected a discount")?;

        assert_eq!(discount.label, "Payment Method Discount");
        assert_eq!(discount.amount, -5_00);
        assert_eq!(totals.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn submit_without_method_only_recalculates() -> TestResult {
        let uuid = CartUuid::new();
        let mut sessions = MockSessionsService::new();
        let mut carts = MockCartsService::new();

        sessions.expect_write_selection().never();
        sessions
            .expect_get_selection()
            .once()
            .return_once(|_| Ok(SessionSelection::default()));

        carts
            .expect_get_cart()
            .once()
            .return_once(move |_| Ok(cart(uuid, 50_00, Vec::new())));

        carts.expect_apply_discount().never();

        let service = checkout(settings_service(true), MockGatewaysService::new(), sessions, carts);

        let totals = service.submit(uuid, None).await?;

        assert!(totals.selected_payment_method.is_none());
        assert_eq!(totals.total, 50_00);

        Ok(())
    }

    #[tokio::test]
    async fn recalculate_missing_cart_is_not_found() {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::NotFound));

        let service = checkout(
            settings_service(true),
            MockGatewaysService::new(),
            MockSessionsService::new(),
            carts,
        );

        let result = service.recalculate(CartUuid::new()).await;

        assert!(
            matches!(result, Err(CheckoutServiceError::CartNotFound)),
            "expected CartNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn available_discounts_lists_gateways_with_rules() -> TestResult {
        let uuid = CartUuid::new();
        let mut carts = MockCartsService::new();
        let mut gateways = MockGatewaysService::new();

        carts
            .expect_get_cart()
            .once()
            .return_once(move |_| Ok(cart(uuid, 0, Vec::new())));

        gateways.expect_list_available().once().return_once(|| {
            Ok(vec![
                Gateway {
                    id: method("bacs"),
                    title: "Direct bank transfer".to_string(),
                    enabled: true,
                    position: 0,
                },
                Gateway {
                    id: method("cheque"),
                    title: "Cheque".to_string(),
                    enabled: true,
                    position: 1,
                },
                Gateway {
                    id: method("cod"),
                    title: "Cash on delivery".to_string(),
                    enabled: true,
                    position: 2,
                },
            ])
        });

        let service = checkout(
            settings_service(true),
            gateways,
            MockSessionsService::new(),
            carts,
        );

        let available = service.available_discounts(uuid).await?;
        let summary: Vec<(String, String)> = available
            .into_iter()
            .map(|discount| (discount.label, discount.summary))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Bank Transfer Discount".to_string(), "10%".to_string()),
                (
                    "Cash on delivery Discount".to_string(),
                    Money::from_minor(20_00, GBP).to_string()
                ),
            ]
        );

        Ok(())
    }
}
