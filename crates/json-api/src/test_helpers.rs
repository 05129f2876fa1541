//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use tender::{fees::FeeSource, methods::PaymentMethodId};
use tender_app::{
    auth::{AdminUuid, MockAuthService},
    context::{AppConfig, AppContext},
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartFee, CartFeeUuid, CartUuid},
        },
        checkout::MockCheckoutService,
        gateways::MockGatewaysService,
        nonces::{MockNoncesService, models::NonceAction},
        sessions::MockSessionsService,
        settings::MockSettingsService,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_ADMIN_UUID: AdminUuid = AdminUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_admin_uuid(TEST_ADMIN_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// One mock per service. A mock without expectations panics on any call, so a test only
/// configures the services its handler is meant to touch.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) carts: MockCartsService,
    pub(crate) settings: MockSettingsService,
    pub(crate) gateways: MockGatewaysService,
    pub(crate) sessions: MockSessionsService,
    pub(crate) nonces: MockNoncesService,
    pub(crate) checkout: MockCheckoutService,
    pub(crate) auth: MockAuthService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            carts: Arc::new(self.carts),
            settings: Arc::new(self.settings),
            gateways: Arc::new(self.gateways),
            sessions: Arc::new(self.sessions),
            nonces: Arc::new(self.nonces),
            checkout: Arc::new(self.checkout),
            auth: Arc::new(self.auth),
            config: AppConfig::default(),
        })
    }

    /// Expect one verification of the checkout nonce `n0nce` for `cart`, and accept it.
    pub(crate) fn accept_checkout_nonce(&mut self, cart: Uuid) {
        self.nonces
            .expect_verify()
            .once()
            .withf(move |action, subject, token| {
                *action == NonceAction::PaymentDiscount && *subject == cart && token == "n0nce"
            })
            .return_once(|_, _, _| Ok(()));
    }

    /// Serve `route` with these mocks and an authenticated administrator.
    pub(crate) fn service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(inject_admin)
                .push(route),
        )
    }

    /// Serve `route` with these mocks and no administrator in the depot.
    pub(crate) fn anonymous_service(self, route: Router) -> Service {
        Service::new(Router::new().hoop(inject(self.into_state())).push(route))
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Mocks {
        auth,
        ..Mocks::default()
    }
    .into_state()
}

pub(crate) fn method(id: &str) -> PaymentMethodId {
    PaymentMethodId::parse(id).unwrap_or_else(|| unreachable!("fixture ids are non-empty"))
}

pub(crate) fn make_cart(uuid: CartUuid, subtotal: i64) -> Cart {
    Cart {
        uuid,
        subtotal,
        fees: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_fee(name: &str, amount: i64, source: FeeSource) -> CartFee {
    CartFee {
        uuid: CartFeeUuid::new(),
        name: name.to_string(),
        amount,
        source,
        created_at: Timestamp::UNIX_EPOCH,
    }
}
