use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::models::access_key::{AccessKey, NewAccessKey};
use crate::models::comic::{
    Chapter, ChapterPage, Comic, ComicUpdate, ComicWithChapters, NewChapter, NewComic, NewPage,
};
use crate::models::comment::{AdminCommentView, CommentView, NewComment};
use crate::models::reading::{BookmarkView, HistoryView};
use crate::models::stats::{CommentStats, ReadingStats};
use crate::models::user::{NewUser, Role, User, UserStatus};

pub mod migrator;
pub mod repositories;

pub use crate::entities::comments::Model as CommentRow;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
        let in_memory = path_str.starts_with(":memory:");

        if !in_memory {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(if in_memory { 1 } else { max_connections })
            .min_connections(min_connections.min(max_connections))
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn key_repo(&self) -> repositories::access_key::AccessKeyRepository {
        repositories::access_key::AccessKeyRepository::new(self.conn.clone())
    }

    fn comic_repo(&self) -> repositories::comic::ComicRepository {
        repositories::comic::ComicRepository::new(self.conn.clone())
    }

    fn reading_repo(&self) -> repositories::reading::ReadingRepository {
        repositories::reading::ReadingRepository::new(self.conn.clone())
    }

    fn bookmark_repo(&self) -> repositories::bookmark::BookmarkRepository {
        repositories::bookmark::BookmarkRepository::new(self.conn.clone())
    }

    fn comment_repo(&self) -> repositories::comment::CommentRepository {
        repositories::comment::CommentRepository::new(self.conn.clone())
    }

    fn stats_repo(&self) -> repositories::stats::StatsRepository {
        repositories::stats::StatsRepository::new(self.conn.clone())
    }

    // Users

    pub async fn create_user(&self, user: NewUser, security: &SecurityConfig) -> Result<User> {
        self.user_repo().create(user, security).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_key(&self, key_id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_key_id(key_id).await
    }

    pub async fn username_or_email_taken(&self, username: &str, email: &str) -> Result<bool> {
        self.user_repo().username_or_email_taken(username, email).await
    }

    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_credentials(username, password).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    pub async fn update_user_profile(
        &self,
        id: i32,
        full_name: Option<String>,
        phone: Option<String>,
    ) -> Result<Option<User>> {
        self.user_repo().update_profile(id, full_name, phone).await
    }

    pub async fn update_user_role_status(
        &self,
        id: i32,
        role: Option<Role>,
        status: Option<UserStatus>,
    ) -> Result<Option<User>> {
        self.user_repo().update_role_status(id, role, status).await
    }

    pub async fn assign_key_to_user(&self, user_id: i32, key_id: i32) -> Result<Option<User>> {
        self.user_repo().assign_key(user_id, key_id).await
    }

    pub async fn set_user_password(
        &self,
        id: i32,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<bool> {
        self.user_repo().set_password(id, password, security).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // Access keys

    pub async fn get_key(&self, id: i32) -> Result<Option<AccessKey>> {
        self.key_repo().get(id).await
    }

    pub async fn get_key_by_value(&self, key_value: &str) -> Result<Option<AccessKey>> {
        self.key_repo().get_by_value(key_value).await
    }

    pub async fn create_key(&self, key: NewAccessKey) -> Result<Option<AccessKey>> {
        self.key_repo().create(key).await
    }

    pub async fn list_keys(&self) -> Result<Vec<AccessKey>> {
        self.key_repo().list_all().await
    }

    pub async fn touch_key(&self, id: i32, now: DateTime<Utc>) -> Result<()> {
        self.key_repo().touch_last_used(id, now).await
    }

    pub async fn set_key_expiry(
        &self,
        id: i32,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Option<AccessKey>> {
        self.key_repo().set_expiry(id, expires_at).await
    }

    pub async fn set_key_active(&self, id: i32, is_active: bool) -> Result<Option<AccessKey>> {
        self.key_repo().set_active(id, is_active).await
    }

    pub async fn delete_key(&self, id: i32) -> Result<bool> {
        self.key_repo().delete(id).await
    }

    pub async fn count_keys(&self) -> Result<u64> {
        self.key_repo().count().await
    }

    // Catalog

    pub async fn get_comic(&self, id: i32) -> Result<Option<Comic>> {
        self.comic_repo().get(id).await
    }

    pub async fn get_comic_with_chapters(&self, id: i32) -> Result<Option<ComicWithChapters>> {
        self.comic_repo().get_with_chapters(id).await
    }

    pub async fn list_comics(&self) -> Result<Vec<ComicWithChapters>> {
        self.comic_repo().list_with_chapters().await
    }

    pub async fn search_comics(&self, query: &str) -> Result<Vec<ComicWithChapters>> {
        self.comic_repo().search_with_chapters(query).await
    }

    pub async fn get_chapter(&self, comic_id: i32, number: i32) -> Result<Option<Chapter>> {
        self.comic_repo().get_chapter(comic_id, number).await
    }

    pub async fn get_chapter_by_id(&self, id: i32) -> Result<Option<Chapter>> {
        self.comic_repo().get_chapter_by_id(id).await
    }

    pub async fn get_chapter_pages(&self, chapter_id: i32) -> Result<Vec<ChapterPage>> {
        self.comic_repo().chapter_pages(chapter_id).await
    }

    pub async fn increment_comic_views(&self, comic_id: i32) -> Result<()> {
        self.comic_repo().increment_views(comic_id).await
    }

    pub async fn create_comic(&self, comic: NewComic) -> Result<Comic> {
        self.comic_repo().create(comic).await
    }

    pub async fn import_comic(
        &self,
        comic: NewComic,
        content: Vec<(NewChapter, Vec<NewPage>)>,
    ) -> Result<Comic> {
        self.comic_repo().import(comic, content).await
    }

    pub async fn update_comic(&self, id: i32, update: ComicUpdate) -> Result<Option<Comic>> {
        self.comic_repo().update(id, update).await
    }

    pub async fn delete_comic(&self, id: i32) -> Result<bool> {
        self.comic_repo().delete(id).await
    }

    pub async fn add_chapter(&self, comic_id: i32, chapter: NewChapter) -> Result<Option<Chapter>> {
        self.comic_repo().add_chapter(comic_id, chapter).await
    }

    pub async fn add_chapter_page(&self, chapter_id: i32, page: NewPage) -> Result<ChapterPage> {
        self.comic_repo().add_page(chapter_id, page).await
    }

    pub async fn count_comics(&self) -> Result<u64> {
        self.comic_repo().count().await
    }

    // Reading state

    pub async fn record_read(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: i32,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.reading_repo()
            .record(key_id, comic_id, chapter_number, now)
            .await
    }

    pub async fn get_history(&self, key_id: i32, limit: u64) -> Result<Vec<HistoryView>> {
        self.reading_repo().history(key_id, limit).await
    }

    pub async fn count_history(&self, key_id: i32) -> Result<u64> {
        self.reading_repo().count_for_key(key_id).await
    }

    pub async fn add_bookmark(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: Option<i32>,
    ) -> Result<bool> {
        self.bookmark_repo().add(key_id, comic_id, chapter_number).await
    }

    pub async fn remove_bookmark(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: Option<i32>,
    ) -> Result<bool> {
        self.bookmark_repo()
            .remove(key_id, comic_id, chapter_number)
            .await
    }

    pub async fn is_bookmarked(
        &self,
        key_id: i32,
        comic_id: i32,
        chapter_number: Option<i32>,
    ) -> Result<bool> {
        self.bookmark_repo()
            .exists(key_id, comic_id, chapter_number)
            .await
    }

    pub async fn list_bookmarks(&self, key_id: i32) -> Result<Vec<BookmarkView>> {
        self.bookmark_repo().list(key_id).await
    }

    // Comments

    pub async fn comment_exists(&self, comic_id: i32, key_id: i32) -> Result<bool> {
        self.comment_repo().exists_for(comic_id, key_id).await
    }

    pub async fn create_comment(&self, comment: NewComment) -> Result<Option<CommentRow>> {
        self.comment_repo().create(comment).await
    }

    pub async fn list_approved_comments(
        &self,
        comic_id: i32,
        limit: u64,
    ) -> Result<Vec<CommentView>> {
        self.comment_repo().list_approved(comic_id, limit).await
    }

    pub async fn list_all_comments(&self) -> Result<Vec<AdminCommentView>> {
        self.comment_repo().list_all().await
    }

    pub async fn delete_comment(&self, id: i32) -> Result<bool> {
        self.comment_repo().delete(id).await
    }

    pub async fn set_comment_approved(&self, id: i32, is_approved: bool) -> Result<bool> {
        self.comment_repo().set_approved(id, is_approved).await
    }

    // Statistics

    pub async fn comment_stats(&self, top_n: u64) -> Result<CommentStats> {
        self.stats_repo().comment_stats(top_n).await
    }

    pub async fn reading_stats(&self, top_n: u64) -> Result<ReadingStats> {
        self.stats_repo().reading_stats(top_n).await
    }
}
