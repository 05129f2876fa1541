//! Available Discounts Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    checkout::{errors::into_status_error, models::AvailableDiscountResponse},
    extensions::*,
    state::State,
};

/// Available Discounts Handler
///
/// Lists the discount each available payment method would give, for display next to the
/// payment method choices. Empty while discounts are disabled.
#[endpoint(
    tags("checkout"),
    summary = "List Available Payment Method Discounts",
    responses(
        (status_code = StatusCode::OK, description = "Discounts on offer"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Vec<AvailableDiscountResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let discounts = state
        .app
        .checkout
        .available_discounts(cart.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(
        discounts
            .into_iter()
            .map(AvailableDiscountResponse::from)
            .collect(),
    ))
}
