//! Test context for service-level integration tests.

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{
        carts::PgCartsService, gateways::PgGatewaysService, nonces::PgNoncesService,
        sessions::PgSessionsService, settings::PgSettingsService,
    },
};

use super::db::TestDb;

pub(crate) struct TestContext {
    pub db: TestDb,
    pub carts: PgCartsService,
    pub settings: PgSettingsService,
    pub gateways: PgGatewaysService,
    pub sessions: PgSessionsService,
    pub nonces: PgNoncesService,
    pub auth: PgAuthService,
}

impl TestContext {
    /// Fresh database with migrations applied and every service wired to it.
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            carts: PgCartsService::new(db.clone()),
            settings: PgSettingsService::new(db.clone()),
            gateways: PgGatewaysService::new(db.clone()),
            sessions: PgSessionsService::new(db.clone()),
            nonces: PgNoncesService::new(db.clone()),
            auth: PgAuthService::new(db),
            db: test_db,
        }
    }
}
