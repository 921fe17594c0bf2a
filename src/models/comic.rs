use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{chapter_pages, chapters, comics};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comic {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub thumbnail: Option<String>,
    pub rating: f64,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub total_chapters: i32,
    pub status: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

impl From<comics::Model> for Comic {
    fn from(model: comics::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author: model.author,
            thumbnail: model.thumbnail,
            rating: model.rating,
            year: model.year,
            genre: model.genre,
            description: model.description,
            total_chapters: model.total_chapters,
            status: model.status,
            views: model.views,
            likes: model.likes,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: i32,
    #[serde(skip)]
    pub comic_id: i32,
    pub number: i32,
    pub title: String,
    pub pages: i32,
    pub release_date: Option<String>,
}

impl From<chapters::Model> for Chapter {
    fn from(model: chapters::Model) -> Self {
        Self {
            id: model.id,
            comic_id: model.comic_id,
            number: model.number,
            title: model.title,
            pages: model.pages,
            release_date: model.release_date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterPage {
    pub page_number: i32,
    pub image_url: String,
}

impl From<chapter_pages::Model> for ChapterPage {
    fn from(model: chapter_pages::Model) -> Self {
        Self {
            page_number: model.page_number,
            image_url: model.image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComicWithChapters {
    #[serde(flatten)]
    pub comic: Comic,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterContent {
    #[serde(flatten)]
    pub chapter: Chapter,
    pub pages_content: Vec<ChapterPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComic {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub views: Option<i64>,
    #[serde(default)]
    pub likes: Option<i64>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComicUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub thumbnail: Option<String>,
    pub rating: Option<f64>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewChapter {
    #[serde(default)]
    pub number: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPage {
    #[serde(default)]
    pub page_number: i32,
    #[serde(default)]
    pub image_url: String,
}
