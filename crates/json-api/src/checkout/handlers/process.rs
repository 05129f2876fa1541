//! Process Checkout Handler
//!
//! The final checkout submission. Its payment method is authoritative: later background
//! notifications for the same cart are ignored.

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tender::methods::PaymentMethodId;

use crate::{
    checkout::{errors::into_status_error, models::CheckoutTotalsResponse},
    extensions::*,
    nonces,
    state::State,
};

/// Process Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProcessCheckoutRequest {
    /// Payment method submitted with the order
    #[serde(default)]
    pub payment_method: Option<String>,

    /// Token issued for this cart
    #[serde(default)]
    pub nonce: String,
}

/// Process Checkout Handler
#[endpoint(
    tags("checkout"),
    summary = "Process Checkout",
    responses(
        (status_code = StatusCode::OK, description = "Selection recorded and cart recalculated"),
        (status_code = StatusCode::FORBIDDEN, description = "Invalid or expired nonce"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<ProcessCheckoutRequest>,
    depot: &mut Depot,
) -> Result<Json<CheckoutTotalsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let cart = cart.into_inner();
    let request = json.into_inner();

    nonces::verify_checkout(state, cart, &request.nonce).await?;

    let method = PaymentMethodId::parse_opt(request.payment_method.as_deref());

    let totals = state
        .app
        .checkout
        .submit(cart.into(), method)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CheckoutTotalsResponse::new(
        totals,
        state.app.config.currency,
    )))
}
