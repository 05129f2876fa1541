//! App Router

use salvo::Router;

use crate::{auth, carts, checkout, settings};

/// Every API route. Storefront checkout routes are public; the cart ledger and the
/// settings form need an administrator API token.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(checkout_router())
        .push(admin_router())
}

fn checkout_router() -> Router {
    Router::with_path("carts/{cart}/checkout")
        .push(Router::with_path("nonce").get(checkout::nonce::handler))
        .push(Router::with_path("payment-method").post(checkout::payment_method::handler))
        .push(
            Router::with_path("update-order-review").post(checkout::update_order_review::handler),
        )
        .push(Router::with_path("process").post(checkout::process::handler))
        .push(Router::with_path("recalculate").post(checkout::recalculate::handler))
        .push(Router::with_path("discounts").get(checkout::discounts::handler))
}

fn admin_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("carts")
                .post(carts::create::handler)
                .push(
                    Router::with_path("{cart}")
                        .get(carts::get::handler)
                        .delete(carts::delete::handler)
                        .push(Router::with_path("fees").post(carts::fees::create::handler)),
                ),
        )
        .push(
            Router::with_path("settings")
                .get(settings::get::handler)
                .post(settings::update::handler),
        )
}
