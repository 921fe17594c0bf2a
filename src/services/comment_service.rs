//! Domain service for comments and ratings.

use thiserror::Error;

use crate::models::comment::{AdminCommentView, CommentView};
use crate::models::stats::CommentStats;

/// Errors specific to comment operations.
#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Comic not found")]
    ComicNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    /// No user holds the key the comment is posted with.
    #[error("User not found")]
    NoUserForKey,

    #[error("You have already reviewed this comic. Each account may review a comic only once.")]
    AlreadyReviewed,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CommentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CommentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for comments.
#[async_trait::async_trait]
pub trait CommentService: Send + Sync {
    /// Approved comments, newest first.
    async fn list_for_comic(&self, comic_id: i32) -> Result<Vec<CommentView>, CommentError>;

    /// Posts a review on behalf of the user holding `key_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CommentError::AlreadyReviewed`] when the key already reviewed the comic.
    async fn post(
        &self,
        comic_id: i32,
        key_id: i32,
        content: Option<String>,
        rating: Option<i32>,
    ) -> Result<CommentView, CommentError>;

    async fn list_all(&self) -> Result<Vec<AdminCommentView>, CommentError>;

    async fn delete(&self, comment_id: i32) -> Result<(), CommentError>;

    async fn set_approved(&self, comment_id: i32, is_approved: bool) -> Result<(), CommentError>;

    async fn stats(&self) -> Result<CommentStats, CommentError>;
}
