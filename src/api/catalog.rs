use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::{KeyScope, MaybeKeyScope};
use super::validation::{parse_id, validate_chapter_number};
use super::{ApiError, ApiResponse, AppState};
use crate::models::comic::{ChapterContent, ComicWithChapters};
use crate::services::CatalogError;

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ComicNotFound | CatalogError::ChapterNotFound => {
                Self::NotFound(err.to_string())
            }
            CatalogError::DuplicateChapter => Self::Conflict(err.to_string()),
            CatalogError::EmptyQuery => Self::ValidationError(err.to_string()),
            CatalogError::Validation(msg) => Self::ValidationError(msg),
            CatalogError::Database(msg) => Self::DatabaseError(msg),
            CatalogError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /comics
pub async fn list_comics(
    State(state): State<Arc<AppState>>,
    KeyScope(_key): KeyScope,
) -> Result<Json<ApiResponse<Vec<ComicWithChapters>>>, ApiError> {
    let comics = state.catalog_service().list().await?;
    Ok(Json(ApiResponse::success(comics)))
}

/// GET /comics/search?q=
pub async fn search_comics(
    State(state): State<Arc<AppState>>,
    KeyScope(_key): KeyScope,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<ComicWithChapters>>>, ApiError> {
    let q = query.q.unwrap_or_default();
    let comics = state.catalog_service().search(&q).await?;
    Ok(Json(ApiResponse::success(comics)))
}

/// GET /comic/{id}
pub async fn get_comic(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ComicWithChapters>>, ApiError> {
    let comic_id = parse_id(&id, "comic")?;
    let comic = state.catalog_service().get(comic_id).await?;
    Ok(Json(ApiResponse::success(comic)))
}

/// GET /comic/{id}/chapter/{number}
///
/// Records the read for the caller's key when `x-key-id` resolves; otherwise
/// the chapter is served without tracking.
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    MaybeKeyScope(key): MaybeKeyScope,
    Path((id, number)): Path<(String, String)>,
) -> Result<Json<ApiResponse<ChapterContent>>, ApiError> {
    let comic_id = parse_id(&id, "comic")?;
    let number = number
        .trim()
        .parse::<i32>()
        .map_err(|_| ApiError::not_found("Chapter not found"))
        .and_then(validate_chapter_number)?;

    let chapter = state.catalog_service().chapter(comic_id, number).await?;

    if let Some(key) = key {
        state
            .reading_service()
            .record_read(key.id, comic_id, number)
            .await?;
    }

    Ok(Json(ApiResponse::success(chapter)))
}
