use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const UP: &[&str] = &[
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_chapters_comic_number ON chapters(comic_id, number)",
    "CREATE INDEX IF NOT EXISTS idx_chapter_pages_chapter ON chapter_pages(chapter_id, page_number)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_reading_history_triple ON reading_history(key_id, comic_id, chapter_number)",
    "CREATE INDEX IF NOT EXISTS idx_reading_history_key_updated ON reading_history(key_id, updated_at)",
    // NULL chapter numbers collapse into their own slot.
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_bookmarks_triple ON bookmarks(key_id, comic_id, ifnull(chapter_number, -1))",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_comments_comic_key ON comments(comic_id, key_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_comic_created ON comments(comic_id, created_at)",
];

const DOWN: &[&str] = &[
    "DROP INDEX IF EXISTS idx_comments_comic_created",
    "DROP INDEX IF EXISTS idx_comments_comic_key",
    "DROP INDEX IF EXISTS idx_bookmarks_triple",
    "DROP INDEX IF EXISTS idx_reading_history_key_updated",
    "DROP INDEX IF EXISTS idx_reading_history_triple",
    "DROP INDEX IF EXISTS idx_chapter_pages_chapter",
    "DROP INDEX IF EXISTS idx_chapters_comic_number",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for sql in UP {
            conn.execute_unprepared(sql).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for sql in DOWN {
            conn.execute_unprepared(sql).await?;
        }

        Ok(())
    }
}
