use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::JsonBody;
use super::auth::KeyScope;
use super::types::BookmarkStatusDto;
use super::validation::{normalize_chapter, parse_optional_chapter};
use super::{ApiError, ApiResponse, AppState};
use crate::models::reading::{BookmarkView, HistoryView};
use crate::services::ReadingError;

impl From<ReadingError> for ApiError {
    fn from(err: ReadingError) -> Self {
        match err {
            ReadingError::ComicNotFound => Self::NotFound(err.to_string()),
            ReadingError::Validation(msg) => Self::ValidationError(msg),
            ReadingError::Database(msg) => Self::DatabaseError(msg),
            ReadingError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct BookmarkRequest {
    #[serde(default, rename = "comicId")]
    pub comic_id: Option<i32>,
    #[serde(default, rename = "chapterNumber")]
    pub chapter_number: Option<i32>,
}

impl BookmarkRequest {
    fn target(&self) -> Result<(i32, Option<i32>), ApiError> {
        let comic_id = self
            .comic_id
            .ok_or_else(|| ApiError::validation("comicId is required"))?;
        Ok((comic_id, normalize_chapter(self.chapter_number)))
    }
}

#[derive(Deserialize)]
pub struct BookmarkCheckQuery {
    #[serde(default, rename = "comicId")]
    pub comic_id: Option<String>,
    #[serde(default, rename = "chapterNumber")]
    pub chapter_number: Option<String>,
}

/// GET /history
pub async fn history(
    State(state): State<Arc<AppState>>,
    KeyScope(key): KeyScope,
) -> Result<Json<ApiResponse<Vec<HistoryView>>>, ApiError> {
    let rows = state.reading_service().history(key.id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// GET /bookmarks
pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    KeyScope(key): KeyScope,
) -> Result<Json<ApiResponse<Vec<BookmarkView>>>, ApiError> {
    let rows = state.reading_service().bookmarks(key.id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// POST /bookmark
pub async fn add_bookmark(
    State(state): State<Arc<AppState>>,
    KeyScope(key): KeyScope,
    JsonBody(payload): JsonBody<BookmarkRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let (comic_id, chapter) = payload.target()?;

    let outcome = state
        .reading_service()
        .add_bookmark(key.id, comic_id, chapter)
        .await?;

    Ok(Json(ApiResponse::message(outcome.message())))
}

/// DELETE /bookmark
pub async fn remove_bookmark(
    State(state): State<Arc<AppState>>,
    KeyScope(key): KeyScope,
    JsonBody(payload): JsonBody<BookmarkRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let (comic_id, chapter) = payload.target()?;

    state
        .reading_service()
        .remove_bookmark(key.id, comic_id, chapter)
        .await?;

    Ok(Json(ApiResponse::message("Bookmark removed")))
}

/// GET /bookmark/check?comicId=&chapterNumber=
pub async fn check_bookmark(
    State(state): State<Arc<AppState>>,
    KeyScope(key): KeyScope,
    Query(query): Query<BookmarkCheckQuery>,
) -> Result<Json<ApiResponse<BookmarkStatusDto>>, ApiError> {
    let Some(comic_id) = query
        .comic_id
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i32>().ok())
    else {
        return Err(ApiError::validation("comicId is required"));
    };
    let chapter = parse_optional_chapter(query.chapter_number.as_deref());

    let is_bookmarked = state
        .reading_service()
        .is_bookmarked(key.id, comic_id, chapter)
        .await?;

    Ok(Json(ApiResponse::success(BookmarkStatusDto { is_bookmarked })))
}
