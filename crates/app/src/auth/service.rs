//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{
        Admin, AdminUuid, ApiTokenMetadata, ApiTokenVersion, AuthServiceError, IssuedApiToken,
        NewAdmin, NewApiToken, build_verifier_input, format_api_token, parse_api_token,
        repository::PgAuthRepository,
    },
    database::Db,
    secrets::{Secret, sha256_hex, verifiers_match},
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
        }
    }

    /// Register a new administrator.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, AuthServiceError> {
        if admin.name.trim().is_empty() {
            return Err(AuthServiceError::InvalidName);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_admin(&mut tx, admin).await?;

        tx.commit().await?;

        Ok(created)
    }

    /// Issue a new API token for the given administrator.
    ///
    /// # Errors
    ///
    /// Returns an error if the administrator does not exist or the insert fails.
    pub async fn issue_api_token(
        &self,
        admin: AdminUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = Secret::generate();
        let token = format_api_token(token_uuid, version, &secret);

        let token_hash = sha256_hex(&build_verifier_input(
            &token_uuid,
            version,
            &admin,
            &secret,
        ));

        let mut tx = self.db.begin().await?;

        let metadata = self
            .repository
            .create_api_token(
                &mut tx,
                NewApiToken {
                    uuid: token_uuid,
                    admin_uuid: admin,
                    version,
                    token_hash,
                    expires_at,
                },
            )
            .await?;

        tx.commit().await?;

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given administrator.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        admin: AdminUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let tokens = self.repository.list_api_tokens(&mut tx, admin).await?;

        tx.commit().await?;

        Ok(tokens)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let revoked = self.repository.revoke_api_token(&mut tx, token_uuid).await?;

        tx.commit().await?;

        Ok(revoked)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<AdminUuid, AuthServiceError> {
        let parsed_token =
            parse_api_token(bearer_token).map_err(|_err| AuthServiceError::NotFound)?;

        let mut tx = self.db.begin().await?;

        let token = self
            .repository
            .find_active_api_token(&mut tx, parsed_token.token_uuid, parsed_token.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let verifier = sha256_hex(&build_verifier_input(
            &parsed_token.token_uuid,
            parsed_token.version,
            &token.admin_uuid,
            &parsed_token.secret,
        ));

        if !verifiers_match(&verifier, &token.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        // Best-effort metadata update; auth success should not depend on this write.
        if let Err(error) = self
            .repository
            .touch_api_token(&mut tx, parsed_token.token_uuid)
            .await
        {
            warn!(%error, "failed to record api token use");

            return Ok(token.admin_uuid);
        }

        tx.commit().await?;

        Ok(token.admin_uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the administrator it was issued to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<AdminUuid, AuthServiceError>;
}
