//! Tag repository.

use std::sync::Arc;

use chrono::Utc;
use reelshelf_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::link::GroupCount;
use crate::entities::{Link, Tag, link, tag};

/// Repository for tag operations.
#[derive(Clone)]
pub struct TagRepository {
    db: Arc<DatabaseConnection>,
}

impl TagRepository {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find tag by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<tag::Model>> {
        Tag::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find tags of a link, in insertion order.
    pub async fn find_by_link(&self, link_id: i32) -> AppResult<Vec<tag::Model>> {
        Tag::find()
            .filter(tag::Column::LinkId.eq(link_id))
            .order_by_asc(tag::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find tags for several links at once.
    pub async fn find_by_links(&self, link_ids: &[i32]) -> AppResult<Vec<tag::Model>> {
        if link_ids.is_empty() {
            return Ok(vec![]);
        }

        Tag::find()
            .filter(tag::Column::LinkId.is_in(link_ids.to_vec()))
            .order_by_asc(tag::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a tag on a link by name.
    pub async fn find_by_link_and_name(
        &self,
        link_id: i32,
        name: &str,
    ) -> AppResult<Option<tag::Model>> {
        Tag::find()
            .filter(tag::Column::LinkId.eq(link_id))
            .filter(tag::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a tag bound to a link.
    pub async fn create(&self, link_id: i32, name: String) -> AppResult<tag::Model> {
        let active_model = tag::ActiveModel {
            name: Set(name),
            link_id: Set(link_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a tag.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Tag::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Most used tag names across a user's links.
    pub async fn popular_for_user(&self, user_id: i32, limit: u64) -> AppResult<Vec<GroupCount>> {
        Tag::find()
            .select_only()
            .column_as(tag::Column::Name, "key")
            .column_as(tag::Column::Id.count(), "count")
            .inner_join(Link)
            .filter(link::Column::UserId.eq(user_id))
            .group_by(tag::Column::Name)
            .order_by_desc(tag::Column::Id.count())
            .order_by_asc(tag::Column::Name)
            .limit(limit)
            .into_model::<GroupCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
