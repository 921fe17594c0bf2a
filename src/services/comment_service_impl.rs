//! `SeaORM` implementation of the `CommentService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::constants::limits;
use crate::db::Store;
use crate::models::comment::{
    AdminCommentView, CommentView, MAX_RATING, MIN_RATING, NewComment, is_valid_rating,
};
use crate::models::stats::CommentStats;
use crate::services::comment_service::{CommentError, CommentService};

pub struct SeaOrmCommentService {
    store: Store,
}

impl SeaOrmCommentService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommentService for SeaOrmCommentService {
    async fn list_for_comic(&self, comic_id: i32) -> Result<Vec<CommentView>, CommentError> {
        Ok(self
            .store
            .list_approved_comments(comic_id, limits::COMMENTS_LIMIT)
            .await?)
    }

    async fn post(
        &self,
        comic_id: i32,
        key_id: i32,
        content: Option<String>,
        rating: Option<i32>,
    ) -> Result<CommentView, CommentError> {
        let content = content.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        let (Some(content), Some(rating)) = (content, rating) else {
            return Err(CommentError::Validation(
                "Content and rating are required".to_string(),
            ));
        };

        let user = self
            .store
            .get_user_by_key(key_id)
            .await?
            .ok_or(CommentError::NoUserForKey)?;

        if !is_valid_rating(rating) {
            return Err(CommentError::Validation(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }

        if self.store.get_comic(comic_id).await?.is_none() {
            return Err(CommentError::ComicNotFound);
        }

        if self.store.comment_exists(comic_id, key_id).await? {
            return Err(CommentError::AlreadyReviewed);
        }

        let row = self
            .store
            .create_comment(NewComment {
                comic_id,
                user_id: user.id,
                key_id,
                content,
                rating,
            })
            .await?
            .ok_or(CommentError::AlreadyReviewed)?;

        Ok(CommentView {
            id: row.id,
            username: user.username,
            content: row.content,
            rating: row.rating,
            created_at: row.created_at,
        })
    }

    async fn list_all(&self) -> Result<Vec<AdminCommentView>, CommentError> {
        Ok(self.store.list_all_comments().await?)
    }

    async fn delete(&self, comment_id: i32) -> Result<(), CommentError> {
        if self.store.delete_comment(comment_id).await? {
            info!(comment_id, "Deleted comment");
            Ok(())
        } else {
            Err(CommentError::CommentNotFound)
        }
    }

    async fn set_approved(&self, comment_id: i32, is_approved: bool) -> Result<(), CommentError> {
        if self
            .store
            .set_comment_approved(comment_id, is_approved)
            .await?
        {
            info!(comment_id, is_approved, "Updated comment approval");
            Ok(())
        } else {
            Err(CommentError::CommentNotFound)
        }
    }

    async fn stats(&self) -> Result<CommentStats, CommentError> {
        Ok(self.store.comment_stats(limits::TOP_N).await?)
    }
}
