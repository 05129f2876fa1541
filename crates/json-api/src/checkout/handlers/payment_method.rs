//! Payment Method Notification Handler
//!
//! Called by the storefront script whenever the shopper picks a payment method, before
//! the checkout is submitted.

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use tender::methods::PaymentMethodId;

use crate::{
    checkout::{errors::into_status_error, models::SelectionResponse},
    extensions::*,
    nonces,
    state::State,
};

/// Payment Method Notification Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentMethodRequest {
    /// Selected payment method id
    #[serde(default)]
    pub payment_method: String,

    /// Token issued for this cart
    #[serde(default)]
    pub nonce: String,
}

/// Payment Method Notification Handler
#[endpoint(
    tags("checkout"),
    summary = "Notify Payment Method Selection",
    responses(
        (status_code = StatusCode::OK, description = "Selection recorded or ignored"),
        (status_code = StatusCode::BAD_REQUEST, description = "Payment method missing"),
        (status_code = StatusCode::FORBIDDEN, description = "Invalid or expired nonce"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<PaymentMethodRequest>,
    depot: &mut Depot,
) -> Result<Json<SelectionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let cart = cart.into_inner();
    let request = json.into_inner();

    nonces::verify_checkout(state, cart, &request.nonce).await?;

    let Some(method) = PaymentMethodId::parse(&request.payment_method) else {
        return Err(StatusError::bad_request().brief("Payment method not specified"));
    };

    let notice = state
        .app
        .checkout
        .notify_selection(cart.into(), method)
        .await
        .map_err(into_status_error)?;

    debug!(
        cart_uuid = %cart,
        payment_method = %notice.payment_method,
        accepted = notice.accepted,
        discount_applied = notice.outcome.discount_applied,
        "payment method notification handled"
    );

    Ok(Json(notice.into()))
}
