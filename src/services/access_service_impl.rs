//! `SeaORM` implementation of the `AccessService` trait.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::db::Store;
use crate::models::access_key::{
    AccessKey, NewAccessKey, bulk_key_value, expiry_after_days, extended_expiry,
    generated_key_value,
};
use crate::services::access_service::{
    AccessError, AccessService, AssignedUser, BulkCreateResult, CreateKeyRequest, KeyAssignment,
    KeyExtension, UnlockResult,
};

pub struct SeaOrmAccessService {
    store: Store,
}

impl SeaOrmAccessService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccessService for SeaOrmAccessService {
    async fn unlock(&self, key_value: &str) -> Result<UnlockResult, AccessError> {
        // Matched exactly; only the empty string is a validation error.
        if key_value.is_empty() {
            return Err(AccessError::EmptyKey);
        }

        let now = Utc::now();
        let key = self
            .store
            .get_key_by_value(key_value)
            .await?
            .filter(|key| key.is_usable_at(now))
            .ok_or(AccessError::Rejected)?;

        self.store.touch_key(key.id, now).await?;
        info!(key_id = key.id, "Catalog unlocked");

        let comics = self.store.list_comics().await?;
        Ok(UnlockResult {
            comics,
            key_id: key.id,
        })
    }

    async fn resolve_handle(&self, handle: Option<&str>) -> Result<AccessKey, AccessError> {
        let handle = handle
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(AccessError::MissingHandle)?;

        let Ok(id) = handle.parse::<i32>() else {
            debug!(handle, "Unparseable key handle");
            return Err(AccessError::InvalidHandle);
        };

        self.store
            .get_key(id)
            .await?
            .ok_or(AccessError::InvalidHandle)
    }

    async fn extend_key(&self, user_id: i32, days: i64) -> Result<KeyExtension, AccessError> {
        if days <= 0 {
            return Err(AccessError::Validation(
                "Extension days must be greater than 0".to_string(),
            ));
        }

        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AccessError::UserHasNoKey)?;
        let key_id = user.key_id.ok_or(AccessError::UserHasNoKey)?;

        let key = self
            .store
            .get_key(key_id)
            .await?
            .ok_or(AccessError::KeyNotFound)?;

        let expires_at = extended_expiry(key.expires_at, Utc::now(), days)?;
        self.store
            .set_key_expiry(key.id, Some(expires_at))
            .await?
            .ok_or(AccessError::KeyNotFound)?;

        info!(user_id, key_id, days, "Extended key");
        Ok(KeyExtension {
            expires_at,
            new_expiry_date: expires_at.format("%d/%m/%Y").to_string(),
        })
    }

    async fn assign_key(
        &self,
        user_id: i32,
        key_value: Option<String>,
        expires_days: Option<i64>,
    ) -> Result<KeyAssignment, AccessError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AccessError::UserNotFound)?;

        let key = match key_value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => self
                .store
                .get_key_by_value(value)
                .await?
                .ok_or(AccessError::KeyNotFound)?,
            None => {
                let now = Utc::now();
                let new_key = NewAccessKey {
                    key_value: generated_key_value(&user.username, now),
                    user_name: Some(user.display_name().to_string()),
                    user_email: Some(user.email.clone()),
                    expires_at: expiry_after_days(now, expires_days)?,
                };
                self.store
                    .create_key(new_key)
                    .await?
                    .ok_or(AccessError::DuplicateKey)?
            }
        };

        self.store
            .assign_key_to_user(user.id, key.id)
            .await?
            .ok_or(AccessError::UserNotFound)?;

        Ok(KeyAssignment {
            user: AssignedUser {
                id: user.id,
                username: user.username,
                email: user.email,
            },
            key: key.summary(),
        })
    }

    async fn list_keys(&self) -> Result<Vec<AccessKey>, AccessError> {
        Ok(self.store.list_keys().await?)
    }

    async fn create_key(&self, request: CreateKeyRequest) -> Result<AccessKey, AccessError> {
        let key_value = request
            .key_value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AccessError::Validation("key_value is required".to_string()))?;

        let new_key = NewAccessKey {
            key_value,
            user_name: request.user_name.filter(|s| !s.is_empty()),
            user_email: request.user_email.filter(|s| !s.is_empty()),
            expires_at: expiry_after_days(Utc::now(), request.expires_days)?,
        };

        self.store
            .create_key(new_key)
            .await?
            .ok_or(AccessError::DuplicateKey)
    }

    async fn create_bulk(
        &self,
        count: u32,
        prefix: &str,
        expires_days: Option<i64>,
    ) -> Result<BulkCreateResult, AccessError> {
        let expires_at = expiry_after_days(Utc::now(), expires_days)?;
        let mut result = BulkCreateResult {
            created: 0,
            errors: 0,
            keys: Vec::new(),
        };

        for index in 1..=count {
            let new_key = NewAccessKey {
                key_value: bulk_key_value(prefix, index),
                user_name: Some(format!("User {index}")),
                user_email: Some(format!("user{index}@example.com")),
                expires_at,
            };

            match self.store.create_key(new_key).await {
                Ok(Some(key)) => {
                    result.created += 1;
                    result.keys.push(key.key_value);
                }
                // Already exists: skipped without counting as an error.
                Ok(None) => {}
                Err(e) => {
                    warn!(index, error = %e, "Bulk key insert failed");
                    result.errors += 1;
                }
            }
        }

        info!(
            created = result.created,
            errors = result.errors,
            prefix,
            "Bulk key creation finished"
        );
        Ok(result)
    }

    async fn set_active(&self, key_id: i32, is_active: bool) -> Result<AccessKey, AccessError> {
        self.store
            .set_key_active(key_id, is_active)
            .await?
            .ok_or(AccessError::KeyNotFound)
    }

    async fn delete_key(&self, key_id: i32) -> Result<(), AccessError> {
        if self.store.delete_key(key_id).await? {
            Ok(())
        } else {
            Err(AccessError::KeyNotFound)
        }
    }
}
