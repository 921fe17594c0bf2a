//! `SeaORM` implementation of the `CatalogService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::models::comic::{
    Chapter, ChapterContent, ChapterPage, Comic, ComicUpdate, ComicWithChapters, NewChapter,
    NewComic, NewPage,
};
use crate::services::catalog_service::{CatalogError, CatalogService};

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list(&self) -> Result<Vec<ComicWithChapters>, CatalogError> {
        Ok(self.store.list_comics().await?)
    }

    async fn search(&self, query: &str) -> Result<Vec<ComicWithChapters>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::EmptyQuery);
        }

        Ok(self.store.search_comics(query).await?)
    }

    async fn get(&self, comic_id: i32) -> Result<ComicWithChapters, CatalogError> {
        self.store
            .get_comic_with_chapters(comic_id)
            .await?
            .ok_or(CatalogError::ComicNotFound)
    }

    async fn chapter(&self, comic_id: i32, number: i32) -> Result<ChapterContent, CatalogError> {
        if self.store.get_comic(comic_id).await?.is_none() {
            return Err(CatalogError::ComicNotFound);
        }

        let chapter = self
            .store
            .get_chapter(comic_id, number)
            .await?
            .ok_or(CatalogError::ChapterNotFound)?;

        let pages_content = self.store.get_chapter_pages(chapter.id).await?;
        Ok(ChapterContent {
            chapter,
            pages_content,
        })
    }

    async fn create(&self, comic: NewComic) -> Result<Comic, CatalogError> {
        if comic.title.trim().is_empty() || comic.author.trim().is_empty() {
            return Err(CatalogError::Validation(
                "Title and author are required".to_string(),
            ));
        }

        Ok(self.store.create_comic(comic).await?)
    }

    async fn update(&self, comic_id: i32, update: ComicUpdate) -> Result<Comic, CatalogError> {
        self.store
            .update_comic(comic_id, update)
            .await?
            .ok_or(CatalogError::ComicNotFound)
    }

    async fn delete(&self, comic_id: i32) -> Result<(), CatalogError> {
        if self.store.delete_comic(comic_id).await? {
            Ok(())
        } else {
            Err(CatalogError::ComicNotFound)
        }
    }

    async fn add_chapter(
        &self,
        comic_id: i32,
        chapter: NewChapter,
    ) -> Result<Chapter, CatalogError> {
        if self.store.get_comic(comic_id).await?.is_none() {
            return Err(CatalogError::ComicNotFound);
        }
        if chapter.number <= 0 {
            return Err(CatalogError::Validation(
                "Chapter number must be greater than 0".to_string(),
            ));
        }

        self.store
            .add_chapter(comic_id, chapter)
            .await?
            .ok_or(CatalogError::DuplicateChapter)
    }

    async fn add_page(&self, chapter_id: i32, page: NewPage) -> Result<ChapterPage, CatalogError> {
        if self.store.get_chapter_by_id(chapter_id).await?.is_none() {
            return Err(CatalogError::ChapterNotFound);
        }
        if page.page_number <= 0 {
            return Err(CatalogError::Validation(
                "Page number must be greater than 0".to_string(),
            ));
        }
        if page.image_url.trim().is_empty() {
            return Err(CatalogError::Validation("image_url is required".to_string()));
        }

        Ok(self.store.add_chapter_page(chapter_id, page).await?)
    }
}
