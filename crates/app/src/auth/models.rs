//! Auth data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::{auth::ApiTokenVersion, uuids::TypedUuid};

/// Administrator UUID
pub type AdminUuid = TypedUuid<Admin>;

/// A store administrator allowed to manage discount settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub uuid: AdminUuid,
    pub name: String,
    pub created_at: Timestamp,
}

/// New administrator payload.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub uuid: AdminUuid,
    pub name: String,
}

/// API token data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveApiToken {
    /// Administrator that owns this API token.
    pub admin_uuid: AdminUuid,

    /// Token format/hash version.
    pub version: ApiTokenVersion,

    /// SHA-256 verifier for the token secret material.
    pub token_hash: String,
}

/// API token metadata persisted in storage.
#[derive(Debug, Clone)]
pub struct ApiTokenMetadata {
    pub uuid: Uuid,
    pub admin_uuid: AdminUuid,
    pub version: ApiTokenVersion,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// New API token persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewApiToken {
    pub uuid: Uuid,
    pub admin_uuid: AdminUuid,
    pub version: ApiTokenVersion,
    pub token_hash: String,
    pub expires_at: Option<Timestamp>,
}

/// API token issuance result with one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedApiToken {
    pub token: String,
    pub metadata: ApiTokenMetadata,
}
