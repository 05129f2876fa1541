//! Update Settings Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use tracing::info;

use tender_app::domain::{nonces::models::NonceAction, settings::form::SettingsForm};

use crate::{
    extensions::*,
    nonces,
    settings::{
        errors::{gateways_status_error, into_status_error},
        models::{SettingsResponse, UpdateSettingsRequest},
    },
    state::State,
};

/// Update Settings Handler
///
/// Replaces the enabled flag and the whole rule set. Methods left out of the submission,
/// or submitted with an empty or non-positive value, end up without a rule.
#[endpoint(
    tags("settings"),
    summary = "Update Discount Settings",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Settings saved"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Invalid or expired nonce"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateSettingsRequest>,
    depot: &mut Depot,
) -> Result<Json<SettingsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let admin = depot.admin_uuid_or_401()?;
    let request = json.into_inner();

    state
        .app
        .nonces
        .verify(
            NonceAction::PaymentDiscountSettings,
            admin.into_uuid(),
            &request.nonce,
        )
        .await
        .map_err(nonces::into_status_error)?;

    let saved = state
        .app
        .settings
        .save_settings(SettingsForm::from(request).into_settings())
        .await
        .map_err(into_status_error)?;

    info!(
        admin_uuid = %admin,
        enabled = saved.enabled,
        rules = saved.rules.len(),
        "saved payment discount settings"
    );

    let gateways = state
        .app
        .gateways
        .list_available()
        .await
        .map_err(gateways_status_error)?;

    Ok(Json(SettingsResponse::new(&saved, gateways)))
}
