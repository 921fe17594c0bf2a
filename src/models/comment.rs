use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::Serialize;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[must_use]
pub const fn is_valid_rating(rating: i32) -> bool {
    rating >= MIN_RATING && rating <= MAX_RATING
}

/// Public view of an approved comment.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct CommentView {
    pub id: i32,
    pub username: String,
    pub content: String,
    pub rating: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Moderation view, including hidden comments.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct AdminCommentView {
    pub id: i32,
    pub comic_id: i32,
    pub comic_title: String,
    pub username: String,
    pub email: String,
    pub content: String,
    pub rating: i32,
    pub is_approved: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub comic_id: i32,
    pub user_id: i32,
    pub key_id: i32,
    pub content: String,
    pub rating: i32,
}
