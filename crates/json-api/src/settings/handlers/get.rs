//! Get Settings Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use tender_app::domain::nonces::models::NonceAction;

use crate::{
    extensions::*,
    nonces,
    settings::{
        errors::{gateways_status_error, into_status_error},
        models::SettingsResponse,
    },
    state::State,
};

/// Settings Form Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SettingsFormResponse {
    pub settings: SettingsResponse,

    /// Token to send back with the form submission
    pub nonce: String,

    /// When the token stops being accepted
    pub nonce_expires_at: String,
}

/// Get Settings Handler
///
/// Returns the discount settings form and a nonce for submitting it.
#[endpoint(
    tags("settings"),
    summary = "Get Discount Settings",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Settings form"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<SettingsFormResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let admin = depot.admin_uuid_or_401()?;

    let settings = state
        .app
        .settings
        .get_settings()
        .await
        .map_err(into_status_error)?;

    let gateways = state
        .app
        .gateways
        .list_available()
        .await
        .map_err(gateways_status_error)?;

    let issued = state
        .app
        .nonces
        .issue(NonceAction::PaymentDiscountSettings, admin.into_uuid())
        .await
        .map_err(nonces::into_status_error)?;

    Ok(Json(SettingsFormResponse {
        settings: SettingsResponse::new(&settings, gateways),
        nonce: issued.token,
        nonce_expires_at: issued.expires_at.to_string(),
    }))
}
