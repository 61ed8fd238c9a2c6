//! Tag service.

use reelshelf_common::{AppError, AppResult};
use reelshelf_db::entities::tag;
use reelshelf_db::repositories::{GroupCount, LinkRepository, TagRepository};
use serde::Serialize;

use super::classifier::{MAX_TAG_LEN, normalize_tag};

/// A tag name and how many of the user's links carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: i64,
}

impl From<GroupCount> for TagCount {
    fn from(row: GroupCount) -> Self {
        Self {
            name: row.key,
            count: row.count,
        }
    }
}

/// Service for managing tags on links.
#[derive(Clone)]
pub struct TagService {
    tag_repo: TagRepository,
    link_repo: LinkRepository,
}

impl TagService {
    /// Create a new tag service.
    #[must_use]
    pub const fn new(tag_repo: TagRepository, link_repo: LinkRepository) -> Self {
        Self {
            tag_repo,
            link_repo,
        }
    }

    async fn ensure_link_owner(&self, user_id: i32, link_id: i32) -> AppResult<()> {
        match self.link_repo.find_by_id(link_id).await? {
            Some(link) if link.user_id == user_id => Ok(()),
            _ => Err(AppError::LinkNotFound(link_id)),
        }
    }

    /// Tags of one of the user's links.
    pub async fn list_for_link(&self, user_id: i32, link_id: i32) -> AppResult<Vec<tag::Model>> {
        self.ensure_link_owner(user_id, link_id).await?;
        self.tag_repo.find_by_link(link_id).await
    }

    /// Add a tag to one of the user's links.
    pub async fn add_to_link(
        &self,
        user_id: i32,
        link_id: i32,
        name: &str,
    ) -> AppResult<tag::Model> {
        let name = normalize_tag(name)
            .ok_or_else(|| AppError::Validation("Tag name must not be empty".to_string()))?;
        if name.chars().count() > MAX_TAG_LEN {
            return Err(AppError::Validation(format!(
                "Tag name must be at most {MAX_TAG_LEN} characters"
            )));
        }

        self.ensure_link_owner(user_id, link_id).await?;

        if self
            .tag_repo
            .find_by_link_and_name(link_id, &name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!("Link already has tag '{name}'")));
        }

        self.tag_repo.create(link_id, name).await
    }

    /// Remove a tag from one of the user's links.
    pub async fn delete(&self, user_id: i32, tag_id: i32) -> AppResult<()> {
        let tag = self
            .tag_repo
            .find_by_id(tag_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag not found: {tag_id}")))?;

        self.ensure_link_owner(user_id, tag.link_id)
            .await
            .map_err(|_| AppError::NotFound(format!("Tag not found: {tag_id}")))?;

        self.tag_repo.delete(tag.id).await
    }

    /// Most used tag names across the user's links.
    pub async fn popular_for_user(&self, user_id: i32, limit: u64) -> AppResult<Vec<TagCount>> {
        let rows = self
            .tag_repo
            .popular_for_user(user_id, limit.clamp(1, 100))
            .await?;
        Ok(rows.into_iter().map(TagCount::from).collect())
    }
}
