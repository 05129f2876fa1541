//! Errors

use salvo::http::StatusError;
use tracing::error;

use tender_app::domain::{gateways::GatewaysServiceError, settings::SettingsServiceError};

pub(crate) fn into_status_error(error: SettingsServiceError) -> StatusError {
    error!("discount settings storage failed: {error}");

    StatusError::internal_server_error()
}

pub(crate) fn gateways_status_error(error: GatewaysServiceError) -> StatusError {
    error!("failed to list payment gateways: {error}");

    StatusError::internal_server_error()
}
