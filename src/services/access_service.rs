//! Domain service for access keys.
//!
//! Handles unlocking the catalog with a key, resolving the `x-key-id` handle,
//! self-service extension and admin key management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::access_key::{AccessKey, ExpiryOutOfRange, KeySummary};
use crate::models::comic::ComicWithChapters;

/// Errors specific to key operations.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Please enter a key")]
    EmptyKey,

    /// Unknown, inactive and expired keys are indistinguishable to the caller.
    #[error("Wrong unlock key or the key has expired")]
    Rejected,

    #[error("Unauthorized")]
    MissingHandle,

    #[error("Invalid key")]
    InvalidHandle,

    #[error("User not found")]
    UserNotFound,

    #[error("User has no key")]
    UserHasNoKey,

    #[error("Key not found")]
    KeyNotFound,

    #[error("Key already exists")]
    DuplicateKey,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccessError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<ExpiryOutOfRange> for AccessError {
    fn from(err: ExpiryOutOfRange) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<anyhow::Error> for AccessError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnlockResult {
    pub comics: Vec<ComicWithChapters>,
    #[serde(rename = "keyId")]
    pub key_id: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyExtension {
    pub expires_at: DateTime<Utc>,
    /// `dd/mm/yyyy`
    pub new_expiry_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignedUser {
    pub id: i32,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyAssignment {
    pub user: AssignedUser,
    pub key: KeySummary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateKeyRequest {
    #[serde(default)]
    pub key_value: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub expires_days: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkCreateResult {
    pub created: u32,
    pub errors: u32,
    pub keys: Vec<String>,
}

/// Domain service trait for access keys.
#[async_trait::async_trait]
pub trait AccessService: Send + Sync {
    /// Validates a key string and returns the full catalog with the key's id.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Rejected`] for unknown, inactive or expired keys.
    async fn unlock(&self, key_value: &str) -> Result<UnlockResult, AccessError>;

    /// Resolves the raw `x-key-id` header to an existing key.
    /// Activity and expiry are not re-checked here.
    async fn resolve_handle(&self, handle: Option<&str>) -> Result<AccessKey, AccessError>;

    /// Pushes the expiry of the user's key `days` into the future.
    async fn extend_key(&self, user_id: i32, days: i64) -> Result<KeyExtension, AccessError>;

    /// Gives a user an existing key (by value) or a freshly generated one, and activates them.
    async fn assign_key(
        &self,
        user_id: i32,
        key_value: Option<String>,
        expires_days: Option<i64>,
    ) -> Result<KeyAssignment, AccessError>;

    async fn list_keys(&self) -> Result<Vec<AccessKey>, AccessError>;

    async fn create_key(&self, request: CreateKeyRequest) -> Result<AccessKey, AccessError>;

    /// Creates `PREFIX_0001` through `PREFIX_<count>`, skipping values that already exist.
    async fn create_bulk(
        &self,
        count: u32,
        prefix: &str,
        expires_days: Option<i64>,
    ) -> Result<BulkCreateResult, AccessError>;

    async fn set_active(&self, key_id: i32, is_active: bool) -> Result<AccessKey, AccessError>;

    async fn delete_key(&self, key_id: i32) -> Result<(), AccessError>;
}
