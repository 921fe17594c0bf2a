//! Domain service for per-key reading state: history and bookmarks.

use thiserror::Error;

use crate::models::reading::{BookmarkView, HistoryView};
use crate::models::stats::ReadingStats;

/// Errors specific to reading state.
#[derive(Debug, Error)]
pub enum ReadingError {
    #[error("Comic not found")]
    ComicNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ReadingError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ReadingError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Outcome of a bookmark add, both are successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkOutcome {
    Added,
    AlreadyBookmarked,
}

impl BookmarkOutcome {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Added => "Bookmark added",
            Self::AlreadyBookmarked => "Already bookmarked",
        }
    }
}

/// Domain service trait for reading progress.
#[async_trait::async_trait]
pub trait ReadingService: Send + Sync {
    /// Upserts the (key, comic, chapter) history row and bumps the comic's views.
    async fn record_read(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: i32,
    ) -> Result<(), ReadingError>;

    /// The most recently read chapters, newest first.
    async fn history(&self, key_id: i32) -> Result<Vec<HistoryView>, ReadingError>;

    async fn bookmarks(&self, key_id: i32) -> Result<Vec<BookmarkView>, ReadingError>;

    /// `None` as chapter bookmarks the whole comic, a slot distinct from every chapter.
    async fn add_bookmark(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: Option<i32>,
    ) -> Result<BookmarkOutcome, ReadingError>;

    async fn remove_bookmark(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: Option<i32>,
    ) -> Result<(), ReadingError>;

    async fn is_bookmarked(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: Option<i32>,
    ) -> Result<bool, ReadingError>;

    async fn stats(&self) -> Result<ReadingStats, ReadingError>;
}
