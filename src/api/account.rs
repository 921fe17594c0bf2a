use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::JsonBody;
use super::auth::AuthUser;
use super::validation::validate_days;
use super::{ApiError, ApiResponse, AppState};
use crate::models::user::UserProfile;
use crate::services::access_service::KeyExtension;

#[derive(Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct ExtendKeyRequest {
    #[serde(default)]
    pub days: Option<i64>,
}

/// PUT /user/profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<ProfileUpdateRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state
        .account_service()
        .update_profile(user.user_id, payload.full_name, payload.phone)
        .await?;

    Ok(Json(ApiResponse::with_message(profile, "Profile updated")))
}

/// POST /user/extend-key
pub async fn extend_key(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<ExtendKeyRequest>,
) -> Result<Json<ApiResponse<KeyExtension>>, ApiError> {
    let days = validate_days(payload.days)?;

    let extension = state.access_service().extend_key(user.user_id, days).await?;

    tracing::info!(user_id = user.user_id, days, "Key extended");
    Ok(Json(ApiResponse::with_message(
        extension,
        format!("Key extended by {days} days"),
    )))
}
