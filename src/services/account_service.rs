//! Domain service for accounts.
//!
//! Handles registration, login, the caller's own profile and admin user management.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::user::{User, UserProfile};
use crate::services::token::Claims;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Account is banned")]
    Banned,

    #[error("Username or email already exists")]
    DuplicateAccount,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid token")]
    InvalidToken,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub user: UserProfile,
}

/// Domain service trait for accounts.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Creates a pending account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::DuplicateAccount`] if the username or email is taken.
    async fn register(&self, request: RegisterRequest) -> Result<Registration, AccountError>;

    /// Verifies credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] for an unknown user or a wrong password
    /// and [`AccountError::Banned`] for banned accounts.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AccountError>;

    /// Verifies a bearer token.
    fn verify_token(&self, token: &str) -> Result<Claims, AccountError>;

    async fn profile(&self, user_id: i32) -> Result<UserProfile, AccountError>;

    async fn update_profile(
        &self,
        user_id: i32,
        full_name: Option<String>,
        phone: Option<String>,
    ) -> Result<UserProfile, AccountError>;

    /// All users, newest first, with key summaries.
    async fn list_users(&self) -> Result<Vec<UserProfile>, AccountError>;

    /// Admin change of status and/or role. Values must name a known status or role.
    async fn update_user(
        &self,
        user_id: i32,
        status: Option<String>,
        role: Option<String>,
    ) -> Result<User, AccountError>;
}
