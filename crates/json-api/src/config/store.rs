//! Store Config

use clap::Args;
use jiff::SignedDuration;

/// Store-wide checkout settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// ISO 4217 code of the currency carts are priced in
    #[arg(long, env = "STORE_CURRENCY", default_value = "GBP")]
    pub currency: String,

    /// How long an issued anti-forgery nonce stays valid, in seconds
    #[arg(long, env = "NONCE_LIFETIME_SECONDS", default_value_t = 86_400_u64)]
    pub nonce_lifetime_seconds: u64,
}

impl StoreConfig {
    /// Nonce lifetime as a signed duration, saturating on overflow.
    #[must_use]
    pub fn nonce_lifetime(&self) -> SignedDuration {
        i64::try_from(self.nonce_lifetime_seconds)
            .map_or(SignedDuration::MAX, SignedDuration::from_secs)
    }
}
