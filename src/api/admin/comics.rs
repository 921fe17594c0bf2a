use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use crate::api::extract::JsonBody;
use crate::api::validation::parse_id;
use crate::api::{ApiError, ApiResponse, AppState};
use crate::models::comic::{
    Chapter, ChapterPage, Comic, ComicUpdate, NewChapter, NewComic, NewPage,
};

/// POST /admin/comics
pub async fn create_comic(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<NewComic>,
) -> Result<Json<ApiResponse<Comic>>, ApiError> {
    let comic = state.catalog_service().create(payload).await?;

    tracing::info!(comic_id = comic.id, title = %comic.title, "Comic created");
    Ok(Json(ApiResponse::with_message(comic, "Comic created")))
}

/// PUT /admin/comics/{id}
pub async fn update_comic(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<ComicUpdate>,
) -> Result<Json<ApiResponse<Comic>>, ApiError> {
    let comic_id = parse_id(&id, "comic")?;
    let comic = state.catalog_service().update(comic_id, payload).await?;
    Ok(Json(ApiResponse::with_message(comic, "Comic updated")))
}

/// DELETE /admin/comics/{id}
pub async fn delete_comic(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let comic_id = parse_id(&id, "comic")?;
    state.catalog_service().delete(comic_id).await?;

    tracing::info!(comic_id, "Comic deleted");
    Ok(Json(ApiResponse::message("Comic deleted")))
}

/// POST /admin/comics/{id}/chapters
pub async fn add_chapter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<NewChapter>,
) -> Result<Json<ApiResponse<Chapter>>, ApiError> {
    let comic_id = parse_id(&id, "comic")?;
    let chapter = state
        .catalog_service()
        .add_chapter(comic_id, payload)
        .await?;
    Ok(Json(ApiResponse::with_message(chapter, "Chapter added")))
}

/// POST /admin/chapters/{id}/pages
pub async fn add_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<NewPage>,
) -> Result<Json<ApiResponse<ChapterPage>>, ApiError> {
    let chapter_id = parse_id(&id, "chapter")?;
    let page = state.catalog_service().add_page(chapter_id, payload).await?;
    Ok(Json(ApiResponse::with_message(page, "Page added")))
}
