//! Link repository.

use std::sync::Arc;

use chrono::Utc;
use reelshelf_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{Link, Tag, link, tag};

/// Ordering for link listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkOrder {
    /// Newest saved first.
    #[default]
    Created,
    /// Most recently viewed first.
    LastViewed,
}

/// Optional filters for link listings.
#[derive(Debug, Clone, Default)]
pub struct LinkFilter {
    /// Platform tag to match exactly.
    pub platform: Option<String>,
    /// Category to match exactly.
    pub category: Option<String>,
}

/// Fields for a new link row.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub url: String,
    pub title: String,
    pub platform: String,
    pub thumbnail_url: Option<String>,
    pub category: String,
    pub duration: Option<i32>,
    pub user_id: i32,
    pub metadata: Option<serde_json::Value>,
}

/// A grouped count (`GROUP BY key`).
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct GroupCount {
    pub key: String,
    pub count: i64,
}

/// Repository for link operations.
#[derive(Clone)]
pub struct LinkRepository {
    db: Arc<DatabaseConnection>,
}

impl LinkRepository {
    /// Create a new link repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find link by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<link::Model>> {
        Link::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find link by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<link::Model> {
        self.find_by_id(id)
            .await?
            .ok_or(AppError::LinkNotFound(id))
    }

    /// Find the newest link a user saved with this exact URL.
    pub async fn find_by_user_and_url(
        &self,
        user_id: i32,
        url: &str,
    ) -> AppResult<Option<link::Model>> {
        Link::find()
            .filter(link::Column::UserId.eq(user_id))
            .filter(link::Column::Url.eq(url))
            .order_by_desc(link::Column::CreatedAt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the newest link with this exact URL and cached classifier output,
    /// regardless of owner.
    pub async fn find_cached_by_url(&self, url: &str) -> AppResult<Option<link::Model>> {
        Link::find()
            .filter(link::Column::Url.eq(url))
            .filter(link::Column::Metadata.is_not_null())
            .order_by_desc(link::Column::CreatedAt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find links by user ID (paginated, filtered).
    pub async fn find_by_user(
        &self,
        user_id: i32,
        filter: &LinkFilter,
        order: LinkOrder,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<link::Model>> {
        let mut query = Link::find().filter(link::Column::UserId.eq(user_id));

        if let Some(platform) = &filter.platform {
            query = query.filter(link::Column::Platform.eq(platform.as_str()));
        }
        if let Some(category) = &filter.category {
            query = query.filter(link::Column::Category.eq(category.as_str()));
        }

        let query = match order {
            LinkOrder::Created => query.order_by(link::Column::CreatedAt, Order::Desc),
            LinkOrder::LastViewed => query.order_by(link::Column::LastViewed, Order::Desc),
        };

        query
            .order_by(link::Column::Id, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count links by user ID.
    pub async fn count_by_user(&self, user_id: i32) -> AppResult<u64> {
        Link::find()
            .filter(link::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count a user's links grouped by platform, largest first.
    pub async fn count_by_platform(&self, user_id: i32) -> AppResult<Vec<GroupCount>> {
        Link::find()
            .select_only()
            .column_as(link::Column::Platform, "key")
            .column_as(link::Column::Id.count(), "count")
            .filter(link::Column::UserId.eq(user_id))
            .group_by(link::Column::Platform)
            .order_by_desc(link::Column::Id.count())
            .into_model::<GroupCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count a user's links grouped by category, largest first.
    pub async fn count_by_category(&self, user_id: i32) -> AppResult<Vec<GroupCount>> {
        Link::find()
            .select_only()
            .column_as(link::Column::Category, "key")
            .column_as(link::Column::Id.count(), "count")
            .filter(link::Column::UserId.eq(user_id))
            .group_by(link::Column::Category)
            .order_by_desc(link::Column::Id.count())
            .into_model::<GroupCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new link.
    pub async fn create(&self, new_link: NewLink) -> AppResult<link::Model> {
        let now = Utc::now();

        let active_model = link::ActiveModel {
            url: Set(new_link.url),
            title: Set(new_link.title),
            platform: Set(new_link.platform),
            thumbnail_url: Set(new_link.thumbnail_url),
            category: Set(new_link.category),
            duration: Set(new_link.duration),
            user_id: Set(new_link.user_id),
            created_at: Set(now.into()),
            last_viewed: Set(now.into()),
            metadata: Set(new_link.metadata),
            ..Default::default()
        };

        active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Change a link's category.
    pub async fn update_category(&self, id: i32, category: String) -> AppResult<link::Model> {
        let link = self.get_by_id(id).await?;

        let mut active: link::ActiveModel = link.into();
        active.category = Set(category);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Bump `last_viewed` to now.
    pub async fn update_last_viewed(&self, id: i32) -> AppResult<link::Model> {
        let link = self.get_by_id(id).await?;

        let mut active: link::ActiveModel = link.into();
        active.last_viewed = Set(Utc::now().into());

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a link and its tags.
    ///
    /// Tags are removed explicitly before the link; tab memberships go with
    /// the foreign key cascade.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Tag::delete_many()
            .filter(tag::Column::LinkId.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Link::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_find_by_id() {
        let link = fixtures::link(1, 10, "https://www.tiktok.com/@demo/video/123");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[link.clone()]])
                .into_connection(),
        );

        let repo = LinkRepository::new(db);
        let result = repo.find_by_id(1).await.unwrap();

        assert_eq!(result.unwrap().url, "https://www.tiktok.com/@demo/video/123");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<link::Model>::new()])
                .into_connection(),
        );

        let repo = LinkRepository::new(db);
        let result = repo.get_by_id(9).await;

        assert!(matches!(result, Err(AppError::LinkNotFound(9))));
    }

    #[tokio::test]
    async fn test_find_cached_by_url_returns_row_with_metadata() {
        let mut link = fixtures::link(3, 20, "https://youtu.be/abcdefghijk");
        link.metadata = Some(serde_json::json!({
            "title": "X",
            "category": "Cooking",
            "tags": ["pasta"],
            "duration": null
        }));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[link.clone()]])
                .into_connection(),
        );

        let repo = LinkRepository::new(db);
        let cached = repo
            .find_cached_by_url("https://youtu.be/abcdefghijk")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(cached.id, 3);
        assert!(cached.metadata.is_some());
    }

    #[tokio::test]
    async fn test_count_by_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(50))
                }]])
                .into_connection(),
        );

        let repo = LinkRepository::new(db);
        let count = repo.count_by_user(10).await.unwrap();

        assert_eq!(count, 50);
    }

    #[tokio::test]
    async fn test_count_by_platform() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! {
                        "key" => sea_orm::Value::String(Some(Box::new("tiktok".to_string()))),
                        "count" => sea_orm::Value::BigInt(Some(7))
                    },
                    maplit::btreemap! {
                        "key" => sea_orm::Value::String(Some(Box::new("youtube".to_string()))),
                        "count" => sea_orm::Value::BigInt(Some(2))
                    },
                ]])
                .into_connection(),
        );

        let repo = LinkRepository::new(db);
        let counts = repo.count_by_platform(10).await.unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].key, "tiktok");
        assert_eq!(counts[0].count, 7);
    }

    #[tokio::test]
    async fn test_create_link() {
        let link = fixtures::link(5, 10, "https://www.instagram.com/reel/Cabc123/");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[link.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 5,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = LinkRepository::new(db);
        let created = repo
            .create(NewLink {
                url: link.url.clone(),
                title: link.title.clone(),
                platform: "instagram".to_string(),
                thumbnail_url: None,
                category: "Uncategorized".to_string(),
                duration: None,
                user_id: 10,
                metadata: None,
            })
            .await
            .unwrap();

        assert_eq!(created.id, 5);
    }

    #[tokio::test]
    async fn test_delete_removes_tags_then_link() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 2,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = LinkRepository::new(db);
        assert!(repo.delete(1).await.is_ok());
    }
}
