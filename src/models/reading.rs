use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::Serialize;

/// A history row joined with the comic it points at.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct HistoryView {
    pub id: i32,
    pub comic_id: i32,
    pub comic_title: String,
    pub comic_thumbnail: Option<String>,
    pub chapter_number: i32,
    pub last_read_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct BookmarkView {
    pub id: i32,
    pub comic_id: i32,
    pub comic_title: String,
    pub comic_thumbnail: Option<String>,
    pub chapter_number: Option<i32>,
    pub created_at: DateTime<Utc>,
}
