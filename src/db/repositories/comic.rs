use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::is_unique_violation;
use crate::entities::{
    bookmarks, chapter_pages, chapters, comics, comments, prelude::*, reading_history,
};
use crate::models::comic::{
    Chapter, ChapterPage, Comic, ComicUpdate, ComicWithChapters, NewChapter, NewComic, NewPage,
};

pub struct ComicRepository {
    conn: DatabaseConnection,
}

impl ComicRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<Comic>> {
        let comic = Comics::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query comic")?;

        Ok(comic.map(Comic::from))
    }

    pub async fn get_with_chapters(&self, id: i32) -> Result<Option<ComicWithChapters>> {
        let Some(comic) = self.get(id).await? else {
            return Ok(None);
        };

        let chapters = self.chapters_for(id).await?;
        Ok(Some(ComicWithChapters { comic, chapters }))
    }

    /// The whole catalog, newest first, each comic with its chapters.
    pub async fn list_with_chapters(&self) -> Result<Vec<ComicWithChapters>> {
        let comics = Comics::find()
            .order_by_desc(comics::Column::CreatedAt)
            .order_by_desc(comics::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list comics")?;

        self.attach_chapters(comics).await
    }

    /// Case-insensitive substring match over title, author, genre and description,
    /// best rated first.
    pub async fn search_with_chapters(&self, query: &str) -> Result<Vec<ComicWithChapters>> {
        let comics = Comics::find()
            .filter(
                Condition::any()
                    .add(comics::Column::Title.contains(query))
                    .add(comics::Column::Author.contains(query))
                    .add(comics::Column::Genre.contains(query))
                    .add(comics::Column::Description.contains(query)),
            )
            .order_by_desc(comics::Column::Rating)
            .order_by_asc(comics::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to search comics")?;

        self.attach_chapters(comics).await
    }

    async fn attach_chapters(&self, comics: Vec<comics::Model>) -> Result<Vec<ComicWithChapters>> {
        if comics.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = comics.iter().map(|c| c.id).collect();
        let mut by_comic: HashMap<i32, Vec<Chapter>> = HashMap::new();

        for chunk in ids.chunks(500) {
            let rows = Chapters::find()
                .filter(chapters::Column::ComicId.is_in(chunk.iter().copied()))
                .order_by_asc(chapters::Column::Number)
                .all(&self.conn)
                .await
                .context("Failed to load chapters")?;

            for row in rows {
                by_comic.entry(row.comic_id).or_default().push(Chapter::from(row));
            }
        }

        Ok(comics
            .into_iter()
            .map(|model| {
                let chapters = by_comic.remove(&model.id).unwrap_or_default();
                ComicWithChapters {
                    comic: Comic::from(model),
                    chapters,
                }
            })
            .collect())
    }

    pub async fn chapters_for(&self, comic_id: i32) -> Result<Vec<Chapter>> {
        let rows = Chapters::find()
            .filter(chapters::Column::ComicId.eq(comic_id))
            .order_by_asc(chapters::Column::Number)
            .all(&self.conn)
            .await
            .context("Failed to load chapters")?;

        Ok(rows.into_iter().map(Chapter::from).collect())
    }

    pub async fn get_chapter(&self, comic_id: i32, number: i32) -> Result<Option<Chapter>> {
        let chapter = Chapters::find()
            .filter(chapters::Column::ComicId.eq(comic_id))
            .filter(chapters::Column::Number.eq(number))
            .one(&self.conn)
            .await
            .context("Failed to query chapter")?;

        Ok(chapter.map(Chapter::from))
    }

    pub async fn get_chapter_by_id(&self, id: i32) -> Result<Option<Chapter>> {
        let chapter = Chapters::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query chapter")?;

        Ok(chapter.map(Chapter::from))
    }

    pub async fn chapter_pages(&self, chapter_id: i32) -> Result<Vec<ChapterPage>> {
        let pages = ChapterPages::find()
            .filter(chapter_pages::Column::ChapterId.eq(chapter_id))
            .order_by_asc(chapter_pages::Column::PageNumber)
            .all(&self.conn)
            .await
            .context("Failed to load chapter pages")?;

        Ok(pages.into_iter().map(ChapterPage::from).collect())
    }

    pub async fn increment_views(&self, comic_id: i32) -> Result<()> {
        Comics::update_many()
            .col_expr(
                comics::Column::Views,
                sea_orm::sea_query::Expr::col(comics::Column::Views).add(1),
            )
            .filter(comics::Column::Id.eq(comic_id))
            .exec(&self.conn)
            .await
            .context("Failed to increment comic views")?;

        Ok(())
    }

    pub async fn create(&self, comic: NewComic) -> Result<Comic> {
        let now = Utc::now();
        let active = comics::ActiveModel {
            title: Set(comic.title),
            author: Set(comic.author),
            thumbnail: Set(comic.thumbnail),
            rating: Set(comic.rating.unwrap_or(0.0)),
            year: Set(comic.year),
            genre: Set(comic.genre),
            description: Set(comic.description),
            total_chapters: Set(0),
            status: Set(comic.status),
            views: Set(comic.views.unwrap_or(0)),
            likes: Set(comic.likes.unwrap_or(0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert comic")?;

        info!(comic_id = model.id, title = %model.title, "Created comic");
        Ok(Comic::from(model))
    }

    pub async fn update(&self, id: i32, update: ComicUpdate) -> Result<Option<Comic>> {
        let Some(comic) = Comics::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: comics::ActiveModel = comic.into();
        if let Some(title) = update.title {
            active.title = Set(title);
        }
        if let Some(author) = update.author {
            active.author = Set(author);
        }
        if let Some(thumbnail) = update.thumbnail {
            active.thumbnail = Set(Some(thumbnail));
        }
        if let Some(rating) = update.rating {
            active.rating = Set(rating);
        }
        if let Some(year) = update.year {
            active.year = Set(Some(year));
        }
        if let Some(genre) = update.genre {
            active.genre = Set(Some(genre));
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(status) = update.status {
            active.status = Set(Some(status));
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.conn).await?;
        Ok(Some(Comic::from(model)))
    }

    /// Removes the comic along with its chapters, pages and every piece of
    /// reading state that points at it.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let chapter_ids: Vec<i32> = Chapters::find()
            .filter(chapters::Column::ComicId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        if !chapter_ids.is_empty() {
            ChapterPages::delete_many()
                .filter(chapter_pages::Column::ChapterId.is_in(chapter_ids))
                .exec(&txn)
                .await?;
        }

        Chapters::delete_many()
            .filter(chapters::Column::ComicId.eq(id))
            .exec(&txn)
            .await?;

        ReadingHistory::delete_many()
            .filter(reading_history::Column::ComicId.eq(id))
            .exec(&txn)
            .await?;

        Bookmarks::delete_many()
            .filter(bookmarks::Column::ComicId.eq(id))
            .exec(&txn)
            .await?;

        Comments::delete_many()
            .filter(comments::Column::ComicId.eq(id))
            .exec(&txn)
            .await?;

        let result = Comics::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed comic with ID: {}", id);
        }
        Ok(removed)
    }

    /// Adds a chapter and refreshes the comic's cached chapter count.
    /// Returns `None` when the comic already has a chapter with that number.
    pub async fn add_chapter(&self, comic_id: i32, chapter: NewChapter) -> Result<Option<Chapter>> {
        let now = Utc::now();
        let active = chapters::ActiveModel {
            comic_id: Set(comic_id),
            number: Set(chapter.number),
            title: Set(chapter.title),
            pages: Set(0),
            release_date: Set(chapter.release_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = match active.insert(&self.conn).await {
            Ok(model) => model,
            Err(e) if is_unique_violation(&e) => return Ok(None),
            Err(e) => return Err(e).context("Failed to insert chapter"),
        };

        recount_chapters(&self.conn, comic_id).await?;
        Ok(Some(Chapter::from(model)))
    }

    /// Adds a page and refreshes the chapter's cached page count.
    pub async fn add_page(&self, chapter_id: i32, page: NewPage) -> Result<ChapterPage> {
        let active = chapter_pages::ActiveModel {
            chapter_id: Set(chapter_id),
            page_number: Set(page.page_number),
            image_url: Set(page.image_url),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert chapter page")?;

        recount_pages(&self.conn, chapter_id).await?;
        Ok(ChapterPage::from(model))
    }

    /// Inserts a comic with all of its chapters and pages in one transaction,
    /// writing the cached counters directly.
    pub async fn import(
        &self,
        comic: NewComic,
        content: Vec<(NewChapter, Vec<NewPage>)>,
    ) -> Result<Comic> {
        let txn = self.conn.begin().await?;
        let now = Utc::now();

        let comic_model = comics::ActiveModel {
            title: Set(comic.title),
            author: Set(comic.author),
            thumbnail: Set(comic.thumbnail),
            rating: Set(comic.rating.unwrap_or(0.0)),
            year: Set(comic.year),
            genre: Set(comic.genre),
            description: Set(comic.description),
            total_chapters: Set(i32::try_from(content.len()).unwrap_or(i32::MAX)),
            status: Set(comic.status),
            views: Set(comic.views.unwrap_or(0)),
            likes: Set(comic.likes.unwrap_or(0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert comic")?;

        for (chapter, pages) in content {
            let chapter_model = chapters::ActiveModel {
                comic_id: Set(comic_model.id),
                number: Set(chapter.number),
                title: Set(chapter.title),
                pages: Set(i32::try_from(pages.len()).unwrap_or(i32::MAX)),
                release_date: Set(chapter.release_date),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .context("Failed to insert chapter")?;

            if pages.is_empty() {
                continue;
            }

            let rows = pages.into_iter().map(|page| chapter_pages::ActiveModel {
                chapter_id: Set(chapter_model.id),
                page_number: Set(page.page_number),
                image_url: Set(page.image_url),
                ..Default::default()
            });

            ChapterPages::insert_many(rows)
                .exec(&txn)
                .await
                .context("Failed to insert chapter pages")?;
        }

        txn.commit().await?;
        Ok(Comic::from(comic_model))
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Comics::find().count(&self.conn).await?)
    }
}

/// Counters are recomputed from a live count rather than incremented, so a
/// lost update converges on the next insert.
pub(crate) async fn recount_chapters<C: ConnectionTrait>(conn: &C, comic_id: i32) -> Result<()> {
    let total = Chapters::find()
        .filter(chapters::Column::ComicId.eq(comic_id))
        .count(conn)
        .await?;

    Comics::update_many()
        .col_expr(
            comics::Column::TotalChapters,
            sea_orm::sea_query::Expr::value(i32::try_from(total).unwrap_or(i32::MAX)),
        )
        .col_expr(comics::Column::UpdatedAt, sea_orm::sea_query::Expr::value(Utc::now()))
        .filter(comics::Column::Id.eq(comic_id))
        .exec(conn)
        .await
        .context("Failed to refresh chapter count")?;

    Ok(())
}

pub(crate) async fn recount_pages<C: ConnectionTrait>(conn: &C, chapter_id: i32) -> Result<()> {
    let total = ChapterPages::find()
        .filter(chapter_pages::Column::ChapterId.eq(chapter_id))
        .count(conn)
        .await?;

    Chapters::update_many()
        .col_expr(
            chapters::Column::Pages,
            sea_orm::sea_query::Expr::value(i32::try_from(total).unwrap_or(i32::MAX)),
        )
        .filter(chapters::Column::Id.eq(chapter_id))
        .exec(conn)
        .await
        .context("Failed to refresh page count")?;

    Ok(())
}
