use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::extract::JsonBody;
use crate::api::types::UserStateDto;
use crate::api::validation::{parse_id, validate_expires_days};
use crate::api::{ApiError, ApiResponse, AppState};
use crate::models::user::UserProfile;
use crate::services::access_service::KeyAssignment;

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct AssignKeyRequest {
    #[serde(default)]
    pub key_value: Option<String>,
    #[serde(default)]
    pub expires_days: Option<i64>,
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, ApiError> {
    let users = state.account_service().list_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// PUT /admin/users/{id}
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserStateDto>>, ApiError> {
    let user_id = parse_id(&id, "user")?;

    let user = state
        .account_service()
        .update_user(user_id, payload.status, payload.role)
        .await?;

    tracing::info!(user_id, status = %user.status, role = %user.role, "User updated");
    Ok(Json(ApiResponse::with_message(
        UserStateDto {
            id: user.id,
            username: user.username,
            status: user.status.to_string(),
            role: user.role.to_string(),
        },
        "User updated",
    )))
}

/// POST /admin/users/{id}/assign-key
pub async fn assign_key(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<AssignKeyRequest>,
) -> Result<Json<ApiResponse<KeyAssignment>>, ApiError> {
    let user_id = parse_id(&id, "user")?;
    let key_value = payload
        .key_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let expires_days = validate_expires_days(payload.expires_days)?;

    let assignment = state
        .access_service()
        .assign_key(user_id, key_value, expires_days)
        .await?;

    Ok(Json(ApiResponse::with_message(assignment, "Key assigned")))
}
