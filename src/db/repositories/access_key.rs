use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::is_unique_violation;
use crate::entities::{access_keys, bookmarks, comments, prelude::*, reading_history, users};
use crate::models::access_key::{AccessKey, NewAccessKey};

pub struct AccessKeyRepository {
    conn: DatabaseConnection,
}

impl AccessKeyRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<AccessKey>> {
        let key = AccessKeys::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query access key by ID")?;

        Ok(key.map(AccessKey::from))
    }

    pub async fn get_by_value(&self, key_value: &str) -> Result<Option<AccessKey>> {
        let key = AccessKeys::find()
            .filter(access_keys::Column::KeyValue.eq(key_value))
            .one(&self.conn)
            .await
            .context("Failed to query access key by value")?;

        Ok(key.map(AccessKey::from))
    }

    /// Inserts a new active key. Returns `None` if the value is already taken.
    pub async fn create(&self, key: NewAccessKey) -> Result<Option<AccessKey>> {
        let now = Utc::now();
        let active = access_keys::ActiveModel {
            key_value: Set(key.key_value),
            user_name: Set(key.user_name),
            user_email: Set(key.user_email),
            expires_at: Set(key.expires_at),
            is_active: Set(true),
            last_used_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => {
                info!(key_id = model.id, "Created access key");
                Ok(Some(AccessKey::from(model)))
            }
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e).context("Failed to insert access key"),
        }
    }

    /// Newest first.
    pub async fn list_all(&self) -> Result<Vec<AccessKey>> {
        let keys = AccessKeys::find()
            .order_by_desc(access_keys::Column::CreatedAt)
            .order_by_desc(access_keys::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list access keys")?;

        Ok(keys.into_iter().map(AccessKey::from).collect())
    }

    pub async fn touch_last_used(&self, id: i32, now: DateTime<Utc>) -> Result<()> {
        AccessKeys::update_many()
            .col_expr(
                access_keys::Column::LastUsedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(access_keys::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to stamp key usage")?;

        Ok(())
    }

    pub async fn set_expiry(
        &self,
        id: i32,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Option<AccessKey>> {
        let Some(key) = AccessKeys::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: access_keys::ActiveModel = key.into();
        active.expires_at = Set(expires_at);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.conn).await?;
        Ok(Some(AccessKey::from(model)))
    }

    pub async fn set_active(&self, id: i32, is_active: bool) -> Result<Option<AccessKey>> {
        let Some(key) = AccessKeys::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: access_keys::ActiveModel = key.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.conn).await?;
        info!(key_id = id, is_active, "Updated access key");
        Ok(Some(AccessKey::from(model)))
    }

    /// Users holding the key lose it and its reading state goes with it.
    /// Comments written under the key are kept with their key cleared.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        Users::update_many()
            .col_expr(
                users::Column::KeyId,
                sea_orm::sea_query::Expr::value(Option::<i32>::None),
            )
            .filter(users::Column::KeyId.eq(id))
            .exec(&txn)
            .await?;

        ReadingHistory::delete_many()
            .filter(reading_history::Column::KeyId.eq(id))
            .exec(&txn)
            .await?;

        Bookmarks::delete_many()
            .filter(bookmarks::Column::KeyId.eq(id))
            .exec(&txn)
            .await?;

        Comments::update_many()
            .col_expr(
                comments::Column::KeyId,
                sea_orm::sea_query::Expr::value(Option::<i32>::None),
            )
            .filter(comments::Column::KeyId.eq(id))
            .exec(&txn)
            .await?;

        let result = AccessKeys::delete_by_id(id)
            .exec(&txn)
            .await
            .context("Failed to delete access key")?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!(key_id = id, "Deleted access key");
        }
        Ok(removed)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(AccessKeys::find().count(&self.conn).await?)
    }
}
