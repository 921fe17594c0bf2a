//! `SeaORM` implementation of the `AccountService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::models::access_key::KeySummary;
use crate::models::user::{NewUser, Role, User, UserProfile, UserStatus};
use crate::services::account_service::{
    AccountError, AccountService, LoginResult, RegisterRequest, Registration,
};
use crate::services::token::{Claims, TokenService};

pub struct SeaOrmAccountService {
    store: Store,
    tokens: TokenService,
    security: SecurityConfig,
}

impl SeaOrmAccountService {
    #[must_use]
    pub fn new(store: Store, security: SecurityConfig) -> Self {
        Self {
            store,
            tokens: TokenService::from_config(&security),
            security,
        }
    }

    async fn key_summary(&self, user: &User) -> Result<Option<KeySummary>, AccountError> {
        let Some(key_id) = user.key_id else {
            return Ok(None);
        };

        // A dangling reference reads as "no key".
        Ok(self.store.get_key(key_id).await?.map(|k| k.summary()))
    }

    async fn with_key(&self, user: User) -> Result<UserProfile, AccountError> {
        let key = self.key_summary(&user).await?;
        Ok(UserProfile::new(user, key))
    }
}

fn required(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn register(&self, request: RegisterRequest) -> Result<Registration, AccountError> {
        let (Some(username), Some(email)) = (required(&request.username), required(&request.email))
        else {
            return Err(AccountError::Validation(
                "Username, email and password are required".to_string(),
            ));
        };
        if request.password.is_empty() {
            return Err(AccountError::Validation(
                "Username, email and password are required".to_string(),
            ));
        }

        if self.store.username_or_email_taken(&username, &email).await? {
            return Err(AccountError::DuplicateAccount);
        }

        let new_user = NewUser {
            username,
            email,
            password: request.password,
            full_name: request.full_name.filter(|s| !s.is_empty()),
            phone: request.phone.filter(|s| !s.is_empty()),
            role: Role::User,
            status: UserStatus::Pending,
        };

        // A concurrent registration can still win the unique index.
        let user = self
            .store
            .create_user(new_user, &self.security)
            .await
            .map_err(|e| match e.downcast_ref::<sea_orm::DbErr>() {
                Some(db) if crate::db::repositories::is_unique_violation(db) => {
                    AccountError::DuplicateAccount
                }
                _ => AccountError::from(e),
            })?;

        Ok(Registration {
            user_id: user.id,
            username: user.username,
            email: user.email,
            status: user.status.to_string(),
        })
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AccountError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AccountError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let user = self
            .store
            .verify_credentials(username.trim(), password)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if user.status == UserStatus::Banned {
            return Err(AccountError::Banned);
        }

        let token = self
            .tokens
            .issue(&user)
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        info!(user_id = user.id, "User logged in");
        let user = self.with_key(user).await?;
        Ok(LoginResult { token, user })
    }

    fn verify_token(&self, token: &str) -> Result<Claims, AccountError> {
        self.tokens
            .verify(token)
            .map_err(|_| AccountError::InvalidToken)
    }

    async fn profile(&self, user_id: i32) -> Result<UserProfile, AccountError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        self.with_key(user).await
    }

    async fn update_profile(
        &self,
        user_id: i32,
        full_name: Option<String>,
        phone: Option<String>,
    ) -> Result<UserProfile, AccountError> {
        let user = self
            .store
            .update_user_profile(user_id, full_name, phone)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        self.with_key(user).await
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>, AccountError> {
        let users = self.store.list_users().await?;

        let mut profiles = Vec::with_capacity(users.len());
        for user in users {
            profiles.push(self.with_key(user).await?);
        }
        Ok(profiles)
    }

    async fn update_user(
        &self,
        user_id: i32,
        status: Option<String>,
        role: Option<String>,
    ) -> Result<User, AccountError> {
        let status = status
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<UserStatus>())
            .transpose()
            .map_err(AccountError::Validation)?;
        let role = role
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<Role>())
            .transpose()
            .map_err(AccountError::Validation)?;

        self.store
            .update_user_role_status(user_id, role, status)
            .await?
            .ok_or(AccountError::UserNotFound)
    }
}
