//! Domain service for the comic catalog.

use thiserror::Error;

use crate::models::comic::{
    Chapter, ChapterContent, ChapterPage, Comic, ComicUpdate, ComicWithChapters, NewChapter,
    NewComic, NewPage,
};

/// Errors specific to catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Comic not found")]
    ComicNotFound,

    #[error("Chapter not found")]
    ChapterNotFound,

    #[error("Chapter already exists")]
    DuplicateChapter,

    #[error("Query required")]
    EmptyQuery,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for browsing and curating comics.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Every comic, newest first, with chapters.
    async fn list(&self) -> Result<Vec<ComicWithChapters>, CatalogError>;

    /// Case-insensitive substring search, best rated first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyQuery`] for a blank query.
    async fn search(&self, query: &str) -> Result<Vec<ComicWithChapters>, CatalogError>;

    async fn get(&self, comic_id: i32) -> Result<ComicWithChapters, CatalogError>;

    /// A chapter with its pages, addressed by comic and chapter number.
    async fn chapter(&self, comic_id: i32, number: i32) -> Result<ChapterContent, CatalogError>;

    async fn create(&self, comic: NewComic) -> Result<Comic, CatalogError>;

    async fn update(&self, comic_id: i32, update: ComicUpdate) -> Result<Comic, CatalogError>;

    /// Deletes the comic with its chapters and pages.
    async fn delete(&self, comic_id: i32) -> Result<(), CatalogError>;

    /// Adds a chapter and keeps `total_chapters` in step with the chapter count.
    async fn add_chapter(&self, comic_id: i32, chapter: NewChapter)
    -> Result<Chapter, CatalogError>;

    /// Adds a page and keeps the chapter's `pages` in step with the page count.
    async fn add_page(&self, chapter_id: i32, page: NewPage) -> Result<ChapterPage, CatalogError>;
}
