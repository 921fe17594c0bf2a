use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, Statement};

use crate::models::stats::{
    ComicAverageRating, ComicCommentCount, ComicReadCount, ComicViews, CommentStats,
    GenreCommentCount, GenreReadCount, ReadingStats, UserCommentCount, UserReadCount,
    round_to_tenth,
};

const TOP_USERS_BY_COMMENTS: &str = "\
    SELECT u.username AS username, u.email AS email, COUNT(*) AS comment_count \
    FROM comments c JOIN users u ON u.id = c.user_id \
    GROUP BY u.id, u.username, u.email \
    ORDER BY comment_count DESC, u.id ASC \
    LIMIT ?";

const TOP_COMICS_BY_COMMENTS: &str = "\
    SELECT m.title AS title, m.genre AS genre, COUNT(*) AS comment_count \
    FROM comments c JOIN comics m ON m.id = c.comic_id \
    GROUP BY m.id, m.title, m.genre \
    ORDER BY comment_count DESC, m.id ASC \
    LIMIT ?";

const GENRES_BY_COMMENTS: &str = "\
    SELECT m.genre AS genre, COUNT(*) AS comment_count \
    FROM comments c JOIN comics m ON m.id = c.comic_id \
    GROUP BY m.genre \
    ORDER BY comment_count DESC";

const TOP_COMICS_BY_RATING: &str = "\
    SELECT m.title AS title, CAST(AVG(c.rating) AS REAL) AS avg_rating, COUNT(*) AS rating_count \
    FROM comments c JOIN comics m ON m.id = c.comic_id \
    GROUP BY m.id, m.title \
    ORDER BY avg_rating DESC, m.id ASC \
    LIMIT ?";

const TOP_COMICS_BY_VIEWS: &str = "\
    SELECT id, title, genre, views FROM comics \
    ORDER BY views DESC, id ASC \
    LIMIT ?";

const TOP_COMICS_BY_READS: &str = "\
    SELECT m.title AS title, m.genre AS genre, COUNT(*) AS read_count \
    FROM reading_history h JOIN comics m ON m.id = h.comic_id \
    GROUP BY m.id, m.title, m.genre \
    ORDER BY read_count DESC, m.id ASC \
    LIMIT ?";

const GENRES_BY_READS: &str = "\
    SELECT m.genre AS genre, COUNT(*) AS read_count \
    FROM reading_history h JOIN comics m ON m.id = h.comic_id \
    GROUP BY m.genre \
    ORDER BY read_count DESC";

// History is keyed by access key; readers are the users holding that key.
const TOP_USERS_BY_READS: &str = "\
    SELECT u.username AS username, u.email AS email, COUNT(*) AS read_count \
    FROM reading_history h JOIN users u ON u.key_id = h.key_id \
    GROUP BY u.id, u.username, u.email \
    ORDER BY read_count DESC, u.id ASC \
    LIMIT ?";

/// Aggregate reports, computed on every request
pub struct StatsRepository {
    conn: DatabaseConnection,
}

impl StatsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn query<T: FromQueryResult>(&self, sql: &str, limit: Option<u64>) -> Result<Vec<T>> {
        let backend = self.conn.get_database_backend();
        let stmt = match limit {
            Some(limit) => Statement::from_sql_and_values(
                backend,
                sql,
                [i64::try_from(limit).unwrap_or(i64::MAX).into()],
            ),
            None => Statement::from_string(backend, sql.to_string()),
        };

        T::find_by_statement(stmt)
            .all(&self.conn)
            .await
            .context("Failed to run statistics query")
    }

    pub async fn comment_stats(&self, top_n: u64) -> Result<CommentStats> {
        let top_users: Vec<UserCommentCount> =
            self.query(TOP_USERS_BY_COMMENTS, Some(top_n)).await?;
        let top_comics: Vec<ComicCommentCount> =
            self.query(TOP_COMICS_BY_COMMENTS, Some(top_n)).await?;
        let top_genres: Vec<GenreCommentCount> = self.query(GENRES_BY_COMMENTS, None).await?;
        let mut avg_ratings: Vec<ComicAverageRating> =
            self.query(TOP_COMICS_BY_RATING, Some(top_n)).await?;

        for row in &mut avg_ratings {
            row.avg_rating = round_to_tenth(row.avg_rating);
        }

        Ok(CommentStats {
            top_users,
            top_comics,
            top_genres,
            avg_ratings,
        })
    }

    pub async fn reading_stats(&self, top_n: u64) -> Result<ReadingStats> {
        Ok(ReadingStats {
            top_comics_by_views: self.query::<ComicViews>(TOP_COMICS_BY_VIEWS, Some(top_n)).await?,
            top_comics_by_reads: self
                .query::<ComicReadCount>(TOP_COMICS_BY_READS, Some(top_n))
                .await?,
            top_genres_by_reads: self.query::<GenreReadCount>(GENRES_BY_READS, None).await?,
            top_users_by_reads: self
                .query::<UserReadCount>(TOP_USERS_BY_READS, Some(top_n))
                .await?,
        })
    }
}
