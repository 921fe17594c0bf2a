//! `SeaORM` implementation of the `ReadingService` trait.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::constants::limits;
use crate::db::Store;
use crate::models::reading::{BookmarkView, HistoryView};
use crate::models::stats::ReadingStats;
use crate::services::reading_service::{BookmarkOutcome, ReadingError, ReadingService};

pub struct SeaOrmReadingService {
    store: Store,
}

impl SeaOrmReadingService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReadingService for SeaOrmReadingService {
    async fn record_read(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: i32,
    ) -> Result<(), ReadingError> {
        self.store
            .record_read(key_id, comic_id, chapter_number, Utc::now())
            .await?;
        self.store.increment_comic_views(comic_id).await?;

        debug!(key_id, comic_id, chapter_number, "Recorded chapter read");
        Ok(())
    }

    async fn history(&self, key_id: i32) -> Result<Vec<HistoryView>, ReadingError> {
        Ok(self
            .store
            .get_history(key_id, limits::HISTORY_LIMIT)
            .await?)
    }

    async fn bookmarks(&self, key_id: i32) -> Result<Vec<BookmarkView>, ReadingError> {
        Ok(self.store.list_bookmarks(key_id).await?)
    }

    async fn add_bookmark(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: Option<i32>,
    ) -> Result<BookmarkOutcome, ReadingError> {
        if self.store.get_comic(comic_id).await?.is_none() {
            return Err(ReadingError::ComicNotFound);
        }

        let added = self
            .store
            .add_bookmark(key_id, comic_id, chapter_number)
            .await?;

        Ok(if added {
            BookmarkOutcome::Added
        } else {
            BookmarkOutcome::AlreadyBookmarked
        })
    }

    async fn remove_bookmark(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: Option<i32>,
    ) -> Result<(), ReadingError> {
        // Removing an absent bookmark is not an error.
        self.store
            .remove_bookmark(key_id, comic_id, chapter_number)
            .await?;
        Ok(())
    }

    async fn is_bookmarked(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: Option<i32>,
    ) -> Result<bool, ReadingError> {
        Ok(self
            .store
            .is_bookmarked(key_id, comic_id, chapter_number)
            .await?)
    }

    async fn stats(&self) -> Result<ReadingStats, ReadingError> {
        Ok(self.store.reading_stats(limits::TOP_N).await?)
    }
}
