use axum::{
    Extension, Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

use super::extract::JsonBody;
use super::{ApiError, ApiResponse, AppState};
use crate::constants::headers::KEY_ID;
use crate::models::access_key::AccessKey;
use crate::models::user::{Role, UserProfile};
use crate::services::AccountError;
use crate::services::account_service::{LoginResult, RegisterRequest, Registration};

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidCredentials | AccountError::InvalidToken => {
                Self::Unauthorized(err.to_string())
            }
            AccountError::Banned => Self::Forbidden(err.to_string()),
            AccountError::DuplicateAccount => Self::Conflict(err.to_string()),
            AccountError::UserNotFound => Self::NotFound(err.to_string()),
            AccountError::Validation(msg) => Self::ValidationError(msg),
            AccountError::Database(msg) => Self::DatabaseError(msg),
            AccountError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// The account behind a verified bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i32,
    pub role: Role,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Requires `Authorization: Bearer <token>` and stores the [`AuthUser`] in request extensions.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let token = bearer_token(request.headers())
            .ok_or_else(|| ApiError::unauthorized("No token provided"))?;
        state.account_service().verify_token(token)?
    };

    let user_id = claims
        .user_id()
        .map_err(|_| ApiError::unauthorized("Invalid token"))?;

    tracing::Span::current().record("user_id", user_id);
    request.extensions_mut().insert(AuthUser {
        user_id,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Must run after [`require_session`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    if user.role != Role::Admin {
        return Err(ApiError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}

fn key_handle(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(KEY_ID)
        .and_then(|value| value.to_str().ok())
}

/// The access key named by the `x-key-id` header.
///
/// Missing header rejects with 401 "Unauthorized", an unknown or malformed one with
/// 401 "Invalid key".
pub struct KeyScope(pub AccessKey);

impl FromRequestParts<Arc<AppState>> for KeyScope {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let key = state
            .access_service()
            .resolve_handle(key_handle(&parts.headers))
            .await?;

        tracing::Span::current().record("key_id", key.id);
        Ok(Self(key))
    }
}

/// Like [`KeyScope`] but never rejects; used where key context is optional.
pub struct MaybeKeyScope(pub Option<AccessKey>);

impl FromRequestParts<Arc<AppState>> for MaybeKeyScope {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let handle = key_handle(&parts.headers);
        if handle.is_none() {
            return Ok(Self(None));
        }

        match state.access_service().resolve_handle(handle).await {
            Ok(key) => {
                tracing::Span::current().record("key_id", key.id);
                Ok(Self(Some(key)))
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable key handle");
                Ok(Self(None))
            }
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<Json<ApiResponse<Registration>>, ApiError> {
    let registration = state.account_service().register(payload).await?;

    Ok(Json(ApiResponse::with_message(
        registration,
        "Registration successful. Please wait for an admin to issue your key.",
    )))
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Username and password are required"));
    }

    let result = state
        .account_service()
        .login(payload.username.trim(), &payload.password)
        .await?;

    Ok(Json(ApiResponse::with_message(result, "Login successful")))
}

/// GET /auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.account_service().profile(user.user_id).await?;
    Ok(Json(ApiResponse::success(profile)))
}
