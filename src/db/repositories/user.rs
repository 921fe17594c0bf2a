use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tokio::task;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{prelude::*, users};
use crate::models::user::{NewUser, Role, User, UserStatus};

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a user, hashing the password off the async runtime.
    pub async fn create(&self, user: NewUser, security: &SecurityConfig) -> Result<User> {
        let password = user.password.clone();
        let security = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .context("Password hashing task panicked")??;

        let now = Utc::now();
        let active = users::ActiveModel {
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(password_hash),
            full_name: Set(user.full_name),
            phone: Set(user.phone),
            role: Set(user.role.as_str().to_string()),
            status: Set(user.status.as_str().to_string()),
            key_id: Set(None),
            registered_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        info!(user_id = model.id, username = %model.username, "Created user");
        Ok(User::from(model))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// First user holding the given key.
    pub async fn get_by_key_id(&self, key_id: i32) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::KeyId.eq(key_id))
            .order_by_asc(users::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query user by key")?;

        Ok(user.map(User::from))
    }

    pub async fn username_or_email_taken(&self, username: &str, email: &str) -> Result<bool> {
        let count = Users::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(username))
                    .add(users::Column::Email.eq(email)),
            )
            .count(&self.conn)
            .await
            .context("Failed to check for existing user")?;

        Ok(count > 0)
    }

    /// Returns the user only when the password matches.
    /// Argon2 verification runs in `spawn_blocking`.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid.then(|| User::from(user)))
    }

    /// Newest registrations first.
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let users = Users::find()
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    /// Absent fields keep their stored value.
    pub async fn update_profile(
        &self,
        id: i32,
        full_name: Option<String>,
        phone: Option<String>,
    ) -> Result<Option<User>> {
        let Some(user) = Users::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();
        if let Some(full_name) = full_name {
            active.full_name = Set(Some(full_name));
        }
        if let Some(phone) = phone {
            active.phone = Set(Some(phone));
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.conn).await?;
        Ok(Some(User::from(model)))
    }

    pub async fn update_role_status(
        &self,
        id: i32,
        role: Option<Role>,
        status: Option<UserStatus>,
    ) -> Result<Option<User>> {
        let Some(user) = Users::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();
        if let Some(role) = role {
            active.role = Set(role.as_str().to_string());
        }
        if let Some(status) = status {
            active.status = Set(status.as_str().to_string());
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.conn).await?;
        info!(user_id = id, role = %model.role, status = %model.status, "Updated user");
        Ok(Some(User::from(model)))
    }

    /// Points the user at `key_id` and activates the account.
    pub async fn assign_key(&self, user_id: i32, key_id: i32) -> Result<Option<User>> {
        let Some(user) = Users::find_by_id(user_id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();
        active.key_id = Set(Some(key_id));
        active.status = Set(UserStatus::Active.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to assign key to user")?;

        info!(user_id, key_id, "Assigned key to user");
        Ok(Some(User::from(model)))
    }

    /// Replaces the password hash. Returns `false` for an unknown user.
    pub async fn set_password(
        &self,
        id: i32,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<bool> {
        let Some(user) = Users::find_by_id(id).one(&self.conn).await? else {
            return Ok(false);
        };

        let password = password.to_string();
        let security = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .context("Password hashing task panicked")??;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(Utc::now());
        active.update(&self.conn).await?;

        info!(user_id = id, "Password reset");
        Ok(true)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Users::find().count(&self.conn).await?)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the crate's default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_is_salted() {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        };

        let a = hash_password("secret1", Some(&config)).unwrap();
        let b = hash_password("secret1", Some(&config)).unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&a).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"secret1", &parsed)
                .is_ok()
        );
    }
}
