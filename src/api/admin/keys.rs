use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::extract::JsonBody;
use crate::api::types::{KeyCreatedDto, KeyStateDto};
use crate::api::validation::{
    parse_id, validate_bulk_count, validate_expires_days, validate_key_prefix,
};
use crate::api::{ApiError, ApiResponse, AppState};
use crate::constants::keys::{DEFAULT_BULK_COUNT, DEFAULT_BULK_PREFIX, MAX_BULK_COUNT};
use crate::models::access_key::AccessKey;
use crate::services::access_service::{BulkCreateResult, CreateKeyRequest};

#[derive(Deserialize)]
pub struct BulkKeysRequest {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub expires_days: Option<i64>,
}

#[derive(Deserialize)]
pub struct KeyActiveRequest {
    #[serde(default)]
    pub is_active: bool,
}

/// GET /admin/keys
pub async fn list_keys(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AccessKey>>>, ApiError> {
    let keys = state.access_service().list_keys().await?;
    Ok(Json(ApiResponse::success(keys)))
}

/// POST /admin/keys
pub async fn create_key(
    State(state): State<Arc<AppState>>,
    JsonBody(mut payload): JsonBody<CreateKeyRequest>,
) -> Result<Json<ApiResponse<KeyCreatedDto>>, ApiError> {
    payload.expires_days = validate_expires_days(payload.expires_days)?;
    let key = state.access_service().create_key(payload).await?;

    tracing::info!(key_id = key.id, "Key created");
    Ok(Json(ApiResponse::with_message(
        KeyCreatedDto { key_id: key.id },
        "Key created",
    )))
}

/// POST /admin/keys/bulk
pub async fn create_bulk(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<BulkKeysRequest>,
) -> Result<Json<ApiResponse<BulkCreateResult>>, ApiError> {
    let count = validate_bulk_count(payload.count.unwrap_or(DEFAULT_BULK_COUNT), MAX_BULK_COUNT)?;
    let prefix = payload
        .prefix
        .unwrap_or_else(|| DEFAULT_BULK_PREFIX.to_string());
    let prefix = validate_key_prefix(&prefix)?;
    let expires_days = validate_expires_days(payload.expires_days)?;

    let result = state
        .access_service()
        .create_bulk(count, prefix, expires_days)
        .await?;

    let message = format!("Created {} keys", result.created);
    Ok(Json(ApiResponse::with_message(result, message)))
}

/// PUT /admin/keys/{id}
pub async fn set_key_active(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<KeyActiveRequest>,
) -> Result<Json<ApiResponse<KeyStateDto>>, ApiError> {
    let key_id = parse_id(&id, "key")?;

    let key = state
        .access_service()
        .set_active(key_id, payload.is_active)
        .await?;

    let message = if key.is_active {
        "Key activated"
    } else {
        "Key deactivated"
    };
    Ok(Json(ApiResponse::with_message(
        KeyStateDto {
            key_value: key.key_value,
            is_active: key.is_active,
        },
        message,
    )))
}

/// DELETE /admin/keys/{id}
pub async fn delete_key(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let key_id = parse_id(&id, "key")?;
    state.access_service().delete_key(key_id).await?;

    tracing::info!(key_id, "Key deleted");
    Ok(Json(ApiResponse::message("Key deleted")))
}
