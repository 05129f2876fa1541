//! Update Order Review Handler
//!
//! Receives the url-encoded checkout form the storefront posts when it refreshes the
//! order review, so the discount follows whatever method the form currently shows.

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    checkout::{errors::into_status_error, models::CheckoutTotalsResponse},
    extensions::*,
    nonces,
    state::State,
};

/// Update Order Review Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderReviewRequest {
    /// The checkout form, url-encoded
    #[serde(default)]
    pub post_data: String,

    /// Token issued for this cart
    #[serde(default)]
    pub nonce: String,
}

/// Update Order Review Handler
#[endpoint(
    tags("checkout"),
    summary = "Update Order Review",
    responses(
        (status_code = StatusCode::OK, description = "Cart recalculated"),
        (status_code = StatusCode::FORBIDDEN, description = "Invalid or expired nonce"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<UpdateOrderReviewRequest>,
    depot: &mut Depot,
) -> Result<Json<CheckoutTotalsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let cart = cart.into_inner();
    let request = json.into_inner();

    nonces::verify_checkout(state, cart, &request.nonce).await?;

    let totals = state
        .app
        .checkout
        .update_order_review(cart.into(), &request.post_data)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CheckoutTotalsResponse::new(
        totals,
        state.app.config.currency,
    )))
}
