use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use tracing::info;

use super::is_unique_violation;
use crate::entities::{comics, comments, prelude::*, users};
use crate::models::comment::{AdminCommentView, CommentView, NewComment};

pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl CommentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn exists_for(&self, comic_id: i32, key_id: i32) -> Result<bool> {
        let count = Comments::find()
            .filter(comments::Column::ComicId.eq(comic_id))
            .filter(comments::Column::KeyId.eq(key_id))
            .count(&self.conn)
            .await
            .context("Failed to check for existing comment")?;

        Ok(count > 0)
    }

    /// Returns `None` when the key already reviewed this comic.
    pub async fn create(&self, comment: NewComment) -> Result<Option<comments::Model>> {
        let active = comments::ActiveModel {
            comic_id: Set(comment.comic_id),
            user_id: Set(comment.user_id),
            key_id: Set(Some(comment.key_id)),
            content: Set(comment.content),
            rating: Set(comment.rating),
            is_approved: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => {
                info!(comment_id = model.id, comic_id = model.comic_id, "Created comment");
                Ok(Some(model))
            }
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e).context("Failed to insert comment"),
        }
    }

    /// Approved comments for one comic, newest first.
    pub async fn list_approved(&self, comic_id: i32, limit: u64) -> Result<Vec<CommentView>> {
        let rows = Comments::find()
            .select_only()
            .column(comments::Column::Id)
            .column_as(users::Column::Username, "username")
            .column(comments::Column::Content)
            .column(comments::Column::Rating)
            .column(comments::Column::CreatedAt)
            .join(JoinType::InnerJoin, comments::Relation::Users.def())
            .filter(comments::Column::ComicId.eq(comic_id))
            .filter(comments::Column::IsApproved.eq(true))
            .order_by_desc(comments::Column::CreatedAt)
            .order_by_desc(comments::Column::Id)
            .limit(limit)
            .into_model::<CommentView>()
            .all(&self.conn)
            .await
            .context("Failed to list comments")?;

        Ok(rows)
    }

    /// Every comment, hidden ones included, newest first.
    pub async fn list_all(&self) -> Result<Vec<AdminCommentView>> {
        let rows = Comments::find()
            .select_only()
            .column(comments::Column::Id)
            .column(comments::Column::ComicId)
            .column_as(comics::Column::Title, "comic_title")
            .column_as(users::Column::Username, "username")
            .column_as(users::Column::Email, "email")
            .column(comments::Column::Content)
            .column(comments::Column::Rating)
            .column(comments::Column::IsApproved)
            .column(comments::Column::CreatedAt)
            .join(JoinType::InnerJoin, comments::Relation::Comics.def())
            .join(JoinType::InnerJoin, comments::Relation::Users.def())
            .order_by_desc(comments::Column::CreatedAt)
            .order_by_desc(comments::Column::Id)
            .into_model::<AdminCommentView>()
            .all(&self.conn)
            .await
            .context("Failed to list all comments")?;

        Ok(rows)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Comments::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete comment")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn set_approved(&self, id: i32, is_approved: bool) -> Result<bool> {
        let result = Comments::update_many()
            .col_expr(
                comments::Column::IsApproved,
                sea_orm::sea_query::Expr::value(is_approved),
            )
            .filter(comments::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to update comment approval")?;

        Ok(result.rows_affected > 0)
    }
}
