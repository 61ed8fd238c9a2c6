//! Custom tab repository.

use std::sync::Arc;

use chrono::Utc;
use reelshelf_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::{CustomTab, Link, LinkTab, custom_tab, link, link_tab};

/// Repository for custom tab operations.
#[derive(Clone)]
pub struct CustomTabRepository {
    db: Arc<DatabaseConnection>,
}

impl CustomTabRepository {
    /// Create a new custom tab repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ==================== Tab Operations ====================

    /// Find tab by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<custom_tab::Model>> {
        CustomTab::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find tabs by user ID, oldest first.
    pub async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<custom_tab::Model>> {
        CustomTab::find()
            .filter(custom_tab::Column::UserId.eq(user_id))
            .order_by(custom_tab::Column::CreatedAt, Order::Asc)
            .order_by(custom_tab::Column::Id, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user's tab by name.
    pub async fn find_by_user_and_name(
        &self,
        user_id: i32,
        name: &str,
    ) -> AppResult<Option<custom_tab::Model>> {
        CustomTab::find()
            .filter(custom_tab::Column::UserId.eq(user_id))
            .filter(custom_tab::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new tab.
    pub async fn create(
        &self,
        user_id: i32,
        name: String,
        description: Option<String>,
    ) -> AppResult<custom_tab::Model> {
        let active_model = custom_tab::ActiveModel {
            user_id: Set(user_id),
            name: Set(name),
            description: Set(description),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a tab.
    pub async fn update(
        &self,
        id: i32,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> AppResult<custom_tab::Model> {
        let tab = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tab not found: {id}")))?;

        let mut active: custom_tab::ActiveModel = tab.into();

        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a tab (memberships go with CASCADE).
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        CustomTab::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    // ==================== Membership Operations ====================

    /// Find the membership row for a link in a tab.
    pub async fn find_membership(
        &self,
        tab_id: i32,
        link_id: i32,
    ) -> AppResult<Option<link_tab::Model>> {
        LinkTab::find()
            .filter(link_tab::Column::TabId.eq(tab_id))
            .filter(link_tab::Column::LinkId.eq(link_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attach a link to a tab.
    pub async fn add_link(&self, tab_id: i32, link_id: i32) -> AppResult<link_tab::Model> {
        let active_model = link_tab::ActiveModel {
            link_id: Set(link_id),
            tab_id: Set(tab_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Detach a link from a tab. Returns whether a row was removed.
    pub async fn remove_link(&self, tab_id: i32, link_id: i32) -> AppResult<bool> {
        let deleted = LinkTab::delete_many()
            .filter(link_tab::Column::TabId.eq(tab_id))
            .filter(link_tab::Column::LinkId.eq(link_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected > 0)
    }

    /// Links in a tab, most recently added first.
    pub async fn find_links(
        &self,
        tab_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<link::Model>> {
        Link::find()
            .inner_join(LinkTab)
            .filter(link_tab::Column::TabId.eq(tab_id))
            .order_by(link_tab::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
