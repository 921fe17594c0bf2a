//! Signed session tokens for accounts.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;
use crate::models::user::{Role, User};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// The numeric user id carried in `sub`.
    pub fn user_id(&self) -> Result<i32, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

/// HS256 issuer and verifier bound to one secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    #[must_use]
    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(&security.jwt_secret, security.token_ttl_days)
    }

    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::default();

        let token_data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|_| TokenError::Invalid)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserStatus;

    fn user(role: Role) -> User {
        User {
            id: 42,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            full_name: None,
            phone: None,
            role,
            status: UserStatus::Active,
            key_id: None,
            registered_at: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = TokenService::new("secret", 7);
        let token = tokens.issue(&user(Role::Admin)).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_rejects_foreign_secret() {
        let token = TokenService::new("one", 7).issue(&user(Role::User)).unwrap();
        assert!(TokenService::new("two", 7).verify(&token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        // Past the default validation leeway.
        let tokens = TokenService::new("secret", -1);
        let token = tokens.issue(&user(Role::User)).unwrap();
        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(TokenService::new("secret", 7).verify("not.a.token").is_err());
    }
}
