//! Add Cart Fee Handler
//!
//! Fees added here are host fees such as surcharges. The payment method discount line is
//! only ever written by checkout recalculation.

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tender_app::domain::carts::models::NewCartFee;

use crate::{
    carts::{errors::into_status_error, models::CartFeeResponse},
    extensions::*,
    state::State,
};

/// Add Cart Fee Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCartFeeRequest {
    /// Label shown on the order
    pub name: String,

    /// Signed amount in minor units
    pub amount: i64,
}

/// Add Cart Fee Handler
#[endpoint(
    tags("carts"),
    summary = "Add Fee to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Fee line added"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<CreateCartFeeRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartFeeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();
    let name = request.name.trim();

    if name.is_empty() {
        return Err(StatusError::bad_request().brief("Fee name cannot be blank"));
    }

    let fee = state
        .app
        .carts
        .add_fee(
            cart.into_inner().into(),
            NewCartFee::host(name, request.amount),
        )
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(CartFeeResponse::new(fee, state.app.config.currency)))
}
