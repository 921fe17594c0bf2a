use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use super::is_unique_violation;
use crate::entities::{bookmarks, comics, prelude::*};
use crate::models::reading::BookmarkView;

pub struct BookmarkRepository {
    conn: DatabaseConnection,
}

/// Matches the exact slot: a `None` chapter only matches whole-comic bookmarks.
fn slot(key_id: i32, comic_id: i32, chapter_number: Option<i32>) -> Condition {
    let chapter = match chapter_number {
        Some(n) => bookmarks::Column::ChapterNumber.eq(n),
        None => bookmarks::Column::ChapterNumber.is_null(),
    };

    Condition::all()
        .add(bookmarks::Column::KeyId.eq(key_id))
        .add(bookmarks::Column::ComicId.eq(comic_id))
        .add(chapter)
}

impl BookmarkRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns `false` when the slot is already bookmarked.
    pub async fn add(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: Option<i32>,
    ) -> Result<bool> {
        if self.exists(key_id, comic_id, chapter_number).await? {
            return Ok(false);
        }

        let active = bookmarks::ActiveModel {
            key_id: Set(key_id),
            comic_id: Set(comic_id),
            chapter_number: Set(chapter_number),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(_) => Ok(true),
            // Lost a race with a concurrent add of the same slot.
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e).context("Failed to insert bookmark"),
        }
    }

    pub async fn remove(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: Option<i32>,
    ) -> Result<bool> {
        let result = Bookmarks::delete_many()
            .filter(slot(key_id, comic_id, chapter_number))
            .exec(&self.conn)
            .await
            .context("Failed to delete bookmark")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn exists(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: Option<i32>,
    ) -> Result<bool> {
        let count = Bookmarks::find()
            .filter(slot(key_id, comic_id, chapter_number))
            .count(&self.conn)
            .await
            .context("Failed to check bookmark")?;

        Ok(count > 0)
    }

    /// Newest first, joined with the comic.
    pub async fn list(&self, key_id: i32) -> Result<Vec<BookmarkView>> {
        let rows = Bookmarks::find()
            .select_only()
            .column(bookmarks::Column::Id)
            .column(bookmarks::Column::ComicId)
            .column_as(comics::Column::Title, "comic_title")
            .column_as(comics::Column::Thumbnail, "comic_thumbnail")
            .column(bookmarks::Column::ChapterNumber)
            .column(bookmarks::Column::CreatedAt)
            .join(JoinType::InnerJoin, bookmarks::Relation::Comics.def())
            .filter(bookmarks::Column::KeyId.eq(key_id))
            .order_by_desc(bookmarks::Column::CreatedAt)
            .order_by_desc(bookmarks::Column::Id)
            .into_model::<BookmarkView>()
            .all(&self.conn)
            .await
            .context("Failed to list bookmarks")?;

        Ok(rows)
    }
}
