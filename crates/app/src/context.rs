//! App Context

use std::sync::Arc;

use jiff::SignedDuration;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        checkout::{CheckoutService, StoreCheckoutService},
        gateways::{GatewaysService, PgGatewaysService},
        nonces::{NoncesService, PgNoncesService, models::DEFAULT_NONCE_LIFETIME},
        sessions::{PgSessionsService, SessionsService},
        settings::{PgSettingsService, SettingsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),

    #[error("unknown store currency {0:?}")]
    UnknownCurrency(String),
}

/// Store-wide settings the services are built with.
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    /// Currency every cart is priced in.
    pub currency: &'static Currency,

    /// How long an anti-forgery nonce stays valid.
    pub nonce_lifetime: SignedDuration,
}

impl AppConfig {
    /// Build a configuration from an ISO 4217 currency code.
    ///
    /// # Errors
    ///
    /// Returns an error when the code is not a known currency.
    pub fn new(currency_code: &str, nonce_lifetime: SignedDuration) -> Result<Self, AppInitError> {
        let currency = iso::find(&currency_code.trim().to_ascii_uppercase())
            .ok_or_else(|| AppInitError::UnknownCurrency(currency_code.to_string()))?;

        Ok(Self {
            currency,
            nonce_lifetime,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency: iso::GBP,
            nonce_lifetime: DEFAULT_NONCE_LIFETIME,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub settings: Arc<dyn SettingsService>,
    pub gateways: Arc<dyn GatewaysService>,
    pub sessions: Arc<dyn SessionsService>,
    pub nonces: Arc<dyn NoncesService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub auth: Arc<dyn AuthService>,
    pub config: AppConfig,
}

impl AppContext {
    /// Build application context from a database URL, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating fails.
    pub async fn from_database_url(url: &str, config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrations)?;

        Ok(Self::from_db(&Db::new(pool), config))
    }

    /// Wire every service against one database handle.
    #[must_use]
    pub fn from_db(db: &Db, config: AppConfig) -> Self {
        let carts: Arc<dyn CartsService> = Arc::new(PgCartsService::new(db.clone()));
        let settings: Arc<dyn SettingsService> = Arc::new(PgSettingsService::new(db.clone()));
        let gateways: Arc<dyn GatewaysService> = Arc::new(PgGatewaysService::new(db.clone()));
        let sessions: Arc<dyn SessionsService> = Arc::new(PgSessionsService::new(db.clone()));

        let checkout = Arc::new(StoreCheckoutService::new(
            Arc::clone(&settings),
            Arc::clone(&gateways),
            Arc::clone(&sessions),
            Arc::clone(&carts),
            config.currency,
        ));

        Self {
            nonces: Arc::new(PgNoncesService::with_lifetime(
                db.clone(),
                config.nonce_lifetime,
            )),
            auth: Arc::new(PgAuthService::new(db.clone())),
            checkout,
            carts,
            settings,
            gateways,
            sessions,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_resolves_currency_code() -> testresult::TestResult {
        let config = AppConfig::new("eur", SignedDuration::from_secs(60))?;

        assert_eq!(config.currency.iso_alpha_code, "EUR");

        Ok(())
    }

    #[test]
    fn config_rejects_unknown_currency() {
        assert!(matches!(
            AppConfig::new("ZZZ", DEFAULT_NONCE_LIFETIME),
            Err(AppInitError::UnknownCurrency(_))
        ));
    }
}
