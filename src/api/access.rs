use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::JsonBody;
use super::{ApiError, ApiResponse, AppState};
use crate::services::AccessError;
use crate::services::access_service::UnlockResult;

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::EmptyKey => Self::ValidationError(err.to_string()),
            AccessError::Rejected => Self::Forbidden(err.to_string()),
            AccessError::MissingHandle | AccessError::InvalidHandle => {
                Self::Unauthorized(err.to_string())
            }
            AccessError::UserNotFound | AccessError::UserHasNoKey | AccessError::KeyNotFound => {
                Self::NotFound(err.to_string())
            }
            AccessError::DuplicateKey => Self::Conflict(err.to_string()),
            AccessError::Validation(msg) => Self::ValidationError(msg),
            AccessError::Database(msg) => Self::DatabaseError(msg),
            AccessError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct UnlockRequest {
    #[serde(default, rename = "unlockKey")]
    pub unlock_key: Option<String>,
}

/// POST /unlock
pub async fn unlock(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<UnlockRequest>,
) -> Result<Json<ApiResponse<UnlockResult>>, ApiError> {
    let key_value = payload.unlock_key.unwrap_or_default();
    let result = state.access_service().unlock(&key_value).await?;

    Ok(Json(ApiResponse::success(result)))
}
