//! Recalculate Checkout Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    checkout::{errors::into_status_error, models::CheckoutTotalsResponse},
    extensions::*,
    state::State,
};

/// Recalculate Checkout Handler
///
/// Re-resolves the discount line from the payment method held in the session.
#[endpoint(
    tags("checkout"),
    summary = "Recalculate Cart Totals",
    responses(
        (status_code = StatusCode::OK, description = "Cart recalculated"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CheckoutTotalsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let totals = state
        .app
        .checkout
        .recalculate(cart.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(CheckoutTotalsResponse::new(
        totals,
        state.app.config.currency,
    )))
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use salvo::test::{ResponseExt, TestClient};
    use tender::fees::FeeSource;
    use testresult::TestResult;

    use tender_app::domain::{
        carts::{CartsServiceError, models::CartUuid},
        checkout::{
            CheckoutServiceError,
            models::{AppliedDiscount, CheckoutTotals},
        },
    };

    use crate::test_helpers::{Mocks, make_fee, method};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.anonymous_service(
            Router::with_path("carts/{cart}/checkout/recalculate").post(handler),
        )
    }

    #[tokio::test]
    async fn test_recalculate_returns_discounted_totals() -> TestResult {
        let cart = CartUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .checkout
            .expect_recalculate()
            .once()
            .withf(move |c| *c == cart)
            .return_once(move |_| {
                Ok(CheckoutTotals {
                    cart,
                    selected_payment_method: Some(method("bacs")),
                    discount: Some(AppliedDiscount {
                        payment_method: method("bacs"),
                        label: "Bank Transfer Discount".to_string(),
                        amount: -10_00,
                    }),
                    subtotal: 100_00,
                    fees: vec![make_fee(
                        "Bank Transfer Discount",
                        -10_00,
                        FeeSource::PaymentMethodDiscount,
                    )],
                    total: 90_00,
                })
            });

        let mut res = TestClient::post(format!(
            "http://example.com/carts/{cart}/checkout/recalculate"
        ))
        .send(&make_service(mocks))
        .await;

        let body: CheckoutTotalsResponse = res.take_json().await?;
        let discount = body.discount.ok_or("expected a discount")?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(discount.label, "Bank Transfer Discount");
        assert_eq!(
            discount.formatted_amount,
            Money::from_minor(-10_00, GBP).to_string()
        );
        assert_eq!(body.total, 90_00);
        assert_eq!(body.fees.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_recalculate_storage_failure_returns_500() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.checkout.expect_recalculate().once().return_once(|_| {
            Err(CheckoutServiceError::Carts(CartsServiceError::Sql(
                sqlx::Error::PoolClosed,
            )))
        });

        let res = TestClient::post(format!(
            "http://example.com/carts/{}/checkout/recalculate",
            Uuid::now_v7()
        ))
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
