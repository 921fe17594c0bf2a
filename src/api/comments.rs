use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::JsonBody;
use super::auth::KeyScope;
use super::validation::parse_id;
use super::{ApiError, ApiResponse, AppState};
use crate::models::comment::CommentView;
use crate::services::CommentError;

impl From<CommentError> for ApiError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::ComicNotFound | CommentError::CommentNotFound => {
                Self::NotFound(err.to_string())
            }
            CommentError::NoUserForKey => Self::Unauthorized(err.to_string()),
            CommentError::AlreadyReviewed => Self::Conflict(err.to_string()),
            CommentError::Validation(msg) => Self::ValidationError(msg),
            CommentError::Database(msg) => Self::DatabaseError(msg),
            CommentError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
}

/// GET /comic/{id}/comments
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<CommentView>>>, ApiError> {
    let comic_id = parse_id(&id, "comic")?;
    let comments = state.comment_service().list_for_comic(comic_id).await?;
    Ok(Json(ApiResponse::success(comments)))
}

/// POST /comic/{id}/comment
pub async fn post_comment(
    State(state): State<Arc<AppState>>,
    KeyScope(key): KeyScope,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<CommentRequest>,
) -> Result<Json<ApiResponse<CommentView>>, ApiError> {
    let comic_id = parse_id(&id, "comic")?;

    let comment = state
        .comment_service()
        .post(comic_id, key.id, payload.content, payload.rating)
        .await?;

    Ok(Json(ApiResponse::with_message(comment, "Comment added")))
}
