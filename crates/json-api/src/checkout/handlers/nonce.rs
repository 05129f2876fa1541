//! Issue Checkout Nonce Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tender_app::domain::nonces::models::NonceAction;

use crate::{carts::errors::into_status_error, extensions::*, nonces, state::State};

/// Nonce Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NonceResponse {
    /// Token to send back with the selection notification
    pub nonce: String,

    /// When the token stops being accepted
    pub expires_at: String,
}

/// Issue Checkout Nonce Handler
///
/// Returns the token the storefront script sends with each payment method notification.
#[endpoint(
    tags("checkout"),
    summary = "Issue Checkout Nonce",
    responses(
        (status_code = StatusCode::OK, description = "Nonce issued"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<NonceResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let cart = cart.into_inner();

    state
        .app
        .carts
        .get_cart(cart.into())
        .await
        .map_err(into_status_error)?;

    let issued = state
        .app
        .nonces
        .issue(NonceAction::PaymentDiscount, cart)
        .await
        .map_err(nonces::into_status_error)?;

    Ok(Json(NonceResponse {
        nonce: issued.token,
        expires_at: issued.expires_at.to_string(),
    }))
}
