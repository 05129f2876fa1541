//! Errors

use salvo::http::StatusError;
use tracing::error;

use tender_app::domain::checkout::CheckoutServiceError;

pub(crate) fn into_status_error(error: CheckoutServiceError) -> StatusError {
    match error {
        CheckoutServiceError::CartNotFound => StatusError::not_found().brief("Cart not found"),
        error => {
            error!("checkout failed: {error}");

            StatusError::internal_server_error()
        }
    }
}
