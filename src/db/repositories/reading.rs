use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{comics, prelude::*, reading_history};
use crate::models::reading::HistoryView;

/// Per-key reading progress
pub struct ReadingRepository {
    conn: DatabaseConnection,
}

impl ReadingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Upsert on (key, comic, chapter): a repeat read only touches `updated_at`.
    pub async fn record(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: i32,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let active = reading_history::ActiveModel {
            key_id: Set(key_id),
            comic_id: Set(comic_id),
            chapter_number: Set(chapter_number),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        ReadingHistory::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    reading_history::Column::KeyId,
                    reading_history::Column::ComicId,
                    reading_history::Column::ChapterNumber,
                ])
                .update_column(reading_history::Column::UpdatedAt)
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to record reading history")?;

        Ok(())
    }

    /// Most recently touched rows first.
    pub async fn history(&self, key_id: i32, limit: u64) -> Result<Vec<HistoryView>> {
        let rows = ReadingHistory::find()
            .select_only()
            .column(reading_history::Column::Id)
            .column(reading_history::Column::ComicId)
            .column_as(comics::Column::Title, "comic_title")
            .column_as(comics::Column::Thumbnail, "comic_thumbnail")
            .column(reading_history::Column::ChapterNumber)
            .column_as(reading_history::Column::UpdatedAt, "last_read_at")
            .join(JoinType::InnerJoin, reading_history::Relation::Comics.def())
            .filter(reading_history::Column::KeyId.eq(key_id))
            .order_by_desc(reading_history::Column::UpdatedAt)
            .order_by_desc(reading_history::Column::Id)
            .limit(limit)
            .into_model::<HistoryView>()
            .all(&self.conn)
            .await
            .context("Failed to load reading history")?;

        Ok(rows)
    }

    pub async fn count_for_key(&self, key_id: i32) -> Result<u64> {
        Ok(ReadingHistory::find()
            .filter(reading_history::Column::KeyId.eq(key_id))
            .count(&self.conn)
            .await?)
    }
}
