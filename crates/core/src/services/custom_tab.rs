//! Custom tab service.

use reelshelf_common::{AppError, AppResult};
use reelshelf_db::entities::{custom_tab, link};
use reelshelf_db::repositories::{CustomTabRepository, LinkRepository};
use serde::Deserialize;
use validator::Validate;

use super::link::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

/// Input for creating a tab.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTabInput {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Input for updating a tab.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTabInput {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Service for managing custom tabs.
#[derive(Clone)]
pub struct CustomTabService {
    tab_repo: CustomTabRepository,
    link_repo: LinkRepository,
}

impl CustomTabService {
    /// Create a new custom tab service.
    #[must_use]
    pub const fn new(tab_repo: CustomTabRepository, link_repo: LinkRepository) -> Self {
        Self {
            tab_repo,
            link_repo,
        }
    }

    /// Get a tab owned by the user.
    pub async fn get_owned(&self, user_id: i32, tab_id: i32) -> AppResult<custom_tab::Model> {
        match self.tab_repo.find_by_id(tab_id).await? {
            Some(tab) if tab.user_id == user_id => Ok(tab),
            _ => Err(AppError::NotFound(format!("Tab not found: {tab_id}"))),
        }
    }

    /// Create a tab.
    pub async fn create(
        &self,
        user_id: i32,
        input: CreateTabInput,
    ) -> AppResult<custom_tab::Model> {
        let name = input.name.trim().to_string();
        let input = CreateTabInput { name, ..input };
        input.validate()?;

        if self
            .tab_repo
            .find_by_user_and_name(user_id, &input.name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Tab '{}' already exists",
                input.name
            )));
        }

        let description = input.description.filter(|d| !d.trim().is_empty());
        self.tab_repo.create(user_id, input.name, description).await
    }

    /// List the user's tabs.
    pub async fn list(&self, user_id: i32) -> AppResult<Vec<custom_tab::Model>> {
        self.tab_repo.find_by_user(user_id).await
    }

    /// Rename a tab or change its description.
    pub async fn update(
        &self,
        user_id: i32,
        tab_id: i32,
        input: UpdateTabInput,
    ) -> AppResult<custom_tab::Model> {
        let input = UpdateTabInput {
            name: input.name.map(|n| n.trim().to_string()),
            ..input
        };
        input.validate()?;

        let tab = self.get_owned(user_id, tab_id).await?;

        if let Some(name) = &input.name
            && *name != tab.name
            && self
                .tab_repo
                .find_by_user_and_name(user_id, name)
                .await?
                .is_some()
        {
            return Err(AppError::Conflict(format!("Tab '{name}' already exists")));
        }

        self.tab_repo
            .update(tab.id, input.name, input.description)
            .await
    }

    /// Delete a tab. Links inside it are kept.
    pub async fn delete(&self, user_id: i32, tab_id: i32) -> AppResult<()> {
        let tab = self.get_owned(user_id, tab_id).await?;
        self.tab_repo.delete(tab.id).await
    }

    /// Put one of the user's links into one of their tabs.
    pub async fn add_link(&self, user_id: i32, tab_id: i32, link_id: i32) -> AppResult<()> {
        let tab = self.get_owned(user_id, tab_id).await?;
        match self.link_repo.find_by_id(link_id).await? {
            Some(link) if link.user_id == user_id => {}
            _ => return Err(AppError::LinkNotFound(link_id)),
        }

        if self
            .tab_repo
            .find_membership(tab.id, link_id)
            .await?
            .is_none()
        {
            self.tab_repo.add_link(tab.id, link_id).await?;
        }
        Ok(())
    }

    /// Take a link out of a tab.
    pub async fn remove_link(&self, user_id: i32, tab_id: i32, link_id: i32) -> AppResult<()> {
        let tab = self.get_owned(user_id, tab_id).await?;
        if self.tab_repo.remove_link(tab.id, link_id).await? {
            Ok(())
        } else {
            Err(AppError::LinkNotFound(link_id))
        }
    }

    /// Links in a tab, most recently added first.
    pub async fn list_links(
        &self,
        user_id: i32,
        tab_id: i32,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> AppResult<Vec<link::Model>> {
        let tab = self.get_owned(user_id, tab_id).await?;
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        self.tab_repo
            .find_links(tab.id, limit, offset.unwrap_or(0))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reelshelf_db::entities::link_tab;
    use reelshelf_db::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> CustomTabService {
        let db = Arc::new(db);
        CustomTabService::new(CustomTabRepository::new(db.clone()), LinkRepository::new(db))
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<custom_tab::Model>::new()])
            .append_query_results([[fixtures::custom_tab(1, 10, "Recipes")]])
            .into_connection();

        let tab = service(db)
            .create(
                10,
                CreateTabInput {
                    name: "  Recipes ".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(tab.name, "Recipes");
    }

    #[tokio::test]
    async fn test_create_duplicate_name_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::custom_tab(1, 10, "Recipes")]])
            .into_connection();

        let result = service(db)
            .create(
                10,
                CreateTabInput {
                    name: "Recipes".to_string(),
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .create(
                10,
                CreateTabInput {
                    name: "   ".to_string(),
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_foreign_tab_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::custom_tab(1, 10, "Recipes")]])
            .into_connection();

        let result = service(db).delete(11, 1).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_link_is_idempotent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::custom_tab(1, 10, "Recipes")]])
            .append_query_results([[fixtures::link(3, 10, "https://youtu.be/abcdefghijk")]])
            .append_query_results([[fixtures::link_tab(9, 1, 3)]])
            .into_connection();

        assert!(service(db).add_link(10, 1, 3).await.is_ok());
    }

    #[tokio::test]
    async fn test_add_link_inserts_membership() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::custom_tab(1, 10, "Recipes")]])
            .append_query_results([[fixtures::link(3, 10, "https://youtu.be/abcdefghijk")]])
            .append_query_results([Vec::<link_tab::Model>::new()])
            .append_query_results([[fixtures::link_tab(9, 1, 3)]])
            .into_connection();

        assert!(service(db).add_link(10, 1, 3).await.is_ok());
    }

    #[tokio::test]
    async fn test_add_foreign_link_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::custom_tab(1, 10, "Recipes")]])
            .append_query_results([[fixtures::link(3, 11, "https://youtu.be/abcdefghijk")]])
            .into_connection();

        let result = service(db).add_link(10, 1, 3).await;

        assert!(matches!(result, Err(AppError::LinkNotFound(3))));
    }

    #[tokio::test]
    async fn test_remove_missing_membership() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::custom_tab(1, 10, "Recipes")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = service(db).remove_link(10, 1, 3).await;

        assert!(matches!(result, Err(AppError::LinkNotFound(3))));
    }

    #[tokio::test]
    async fn test_rename_to_existing_name_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::custom_tab(1, 10, "Recipes")]])
            .append_query_results([[fixtures::custom_tab(2, 10, "Workouts")]])
            .into_connection();

        let result = service(db)
            .update(
                10,
                1,
                UpdateTabInput {
                    name: Some("Workouts".to_string()),
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_update_input_distinguishes_null_description() {
        let cleared: UpdateTabInput =
            serde_json::from_value(serde_json::json!({ "description": null })).unwrap();
        assert_eq!(cleared.description, Some(None));

        let untouched: UpdateTabInput = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(untouched.description, None);
    }
}
