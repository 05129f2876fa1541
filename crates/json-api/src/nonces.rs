//! Nonce verification shared by the checkout and settings handlers.

use salvo::http::StatusError;
use tracing::error;
use uuid::Uuid;

use tender_app::domain::nonces::{NoncesServiceError, models::NonceAction};

use crate::state::State;

/// Verify the checkout nonce issued for `cart`. Every checkout request that writes the
/// session goes through here before touching anything.
pub(crate) async fn verify_checkout(
    state: &State,
    cart: Uuid,
    token: &str,
) -> Result<(), StatusError> {
    state
        .app
        .nonces
        .verify(NonceAction::PaymentDiscount, cart, token)
        .await
        .map_err(into_status_error)
}

pub(crate) fn into_status_error(error: NoncesServiceError) -> StatusError {
    match error {
        NoncesServiceError::Invalid => StatusError::forbidden().brief("Invalid or expired nonce"),
        NoncesServiceError::Lifetime(source) => {
            error!("failed to compute nonce expiry: {source}");

            StatusError::internal_server_error()
        }
        NoncesServiceError::Sql(source) => {
            error!("nonce storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
