//! Nonces service.
//!
//! A nonce is a random token bound to an action and a subject (a cart or an
//! administrator). It stays valid until it expires; only its SHA-256 digest is stored.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::debug;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::nonces::{
        errors::NoncesServiceError,
        models::{DEFAULT_NONCE_LIFETIME, IssuedNonce, NonceAction},
        repository::PgNoncesRepository,
    },
    secrets::{Secret, sha256_hex},
};

#[derive(Debug, Clone)]
pub struct PgNoncesService {
    db: Db,
    repository: PgNoncesRepository,
    lifetime: SignedDuration,
}

impl PgNoncesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self::with_lifetime(db, DEFAULT_NONCE_LIFETIME)
    }

    #[must_use]
    pub fn with_lifetime(db: Db, lifetime: SignedDuration) -> Self {
        Self {
            db,
            repository: PgNoncesRepository::new(),
            lifetime,
        }
    }
}

#[async_trait]
impl NoncesService for PgNoncesService {
    async fn issue(
        &self,
        action: NonceAction,
        subject: Uuid,
    ) -> Result<IssuedNonce, NoncesServiceError> {
        let secret = Secret::generate();
        let token = secret.to_hex();
        let expires_at = Timestamp::now()
            .checked_add(self.lifetime)
            .map_err(NoncesServiceError::Lifetime)?;

        let mut tx = self.db.begin().await?;

        let pruned = self.repository.delete_expired(&mut tx).await?;

        self.repository
            .create_nonce(
                &mut tx,
                &sha256_hex(token.as_bytes()),
                action,
                subject,
                expires_at,
            )
            .await?;

        tx.commit().await?;

        if pruned > 0 {
            debug!(pruned, "removed expired nonces");
        }

        Ok(IssuedNonce { token, expires_at })
    }

    async fn verify(
        &self,
        action: NonceAction,
        subject: Uuid,
        token: &str,
    ) -> Result<(), NoncesServiceError> {
        if Secret::from_hex(token).is_none() {
            return Err(NoncesServiceError::Invalid);
        }

        let mut tx = self.db.begin().await?;

        let exists = self
            .repository
            .nonce_exists(&mut tx, &sha256_hex(token.as_bytes()), action, subject)
            .await?;

        tx.commit().await?;

        if exists {
            Ok(())
        } else {
            Err(NoncesServiceError::Invalid)
        }
    }
}

#[automock]
#[async_trait]
pub trait NoncesService: Send + Sync {
    /// Issue a nonce for the action and subject.
    async fn issue(
        &self,
        action: NonceAction,
        subject: Uuid,
    ) -> Result<IssuedNonce, NoncesServiceError>;

    /// Check a token presented with a request.
    async fn verify(
        &self,
        action: NonceAction,
        subject: Uuid,
        token: &str,
    ) -> Result<(), NoncesServiceError>;
}
