use axum::{Json, extract::State};
use std::sync::Arc;

use crate::api::{ApiError, ApiResponse, AppState};
use crate::models::stats::{CommentStats, ReadingStats};

/// GET /admin/stats/comments
pub async fn comment_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<CommentStats>>, ApiError> {
    let stats = state.comment_service().stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// GET /admin/stats/reading
pub async fn reading_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ReadingStats>>, ApiError> {
    let stats = state.reading_service().stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}
