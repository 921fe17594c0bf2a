use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::extract::JsonBody;
use crate::api::validation::parse_id;
use crate::api::{ApiError, ApiResponse, AppState};
use crate::models::comment::AdminCommentView;

#[derive(Deserialize)]
pub struct ApproveRequest {
    #[serde(default)]
    pub is_approved: bool,
}

/// GET /admin/comments
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AdminCommentView>>>, ApiError> {
    let comments = state.comment_service().list_all().await?;
    Ok(Json(ApiResponse::success(comments)))
}

/// DELETE /admin/comments/{id}
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let comment_id = parse_id(&id, "comment")?;
    state.comment_service().delete(comment_id).await?;
    Ok(Json(ApiResponse::message("Comment deleted")))
}

/// PUT /admin/comments/{id}/approve
pub async fn approve_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<ApproveRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let comment_id = parse_id(&id, "comment")?;

    state
        .comment_service()
        .set_approved(comment_id, payload.is_approved)
        .await?;

    Ok(Json(ApiResponse::message(if payload.is_approved {
        "Comment approved"
    } else {
        "Comment hidden"
    })))
}
