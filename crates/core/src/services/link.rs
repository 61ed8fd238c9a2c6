//! Link library service.

use std::collections::HashMap;

use reelshelf_common::{AppError, AppResult};
use reelshelf_db::entities::{link, tag};
use reelshelf_db::repositories::{LinkFilter, LinkOrder, LinkRepository, TagRepository};
use serde::Deserialize;
use tracing::info;

use super::classifier::MAX_CATEGORY_LEN;

/// Default page size for link listings.
pub const DEFAULT_LIST_LIMIT: u64 = 20;

/// Maximum page size for link listings.
pub const MAX_LIST_LIMIT: u64 = 100;

/// A link together with its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkWithTags {
    pub link: link::Model,
    pub tags: Vec<tag::Model>,
}

/// Which links a listing covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// Every link, newest saved first.
    #[default]
    All,
    /// Every link, most recently viewed first.
    Recent,
}

/// Listing parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListLinksQuery {
    pub platform: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: ListKind,
    pub category: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Service for browsing and managing saved links.
#[derive(Clone)]
pub struct LinkService {
    link_repo: LinkRepository,
    tag_repo: TagRepository,
}

impl LinkService {
    /// Create a new link service.
    #[must_use]
    pub const fn new(link_repo: LinkRepository, tag_repo: TagRepository) -> Self {
        Self { link_repo, tag_repo }
    }

    /// Load a link owned by `user_id`. Links of other users are reported as
    /// missing.
    pub async fn get_owned(&self, user_id: i32, link_id: i32) -> AppResult<link::Model> {
        match self.link_repo.find_by_id(link_id).await? {
            Some(link) if link.user_id == user_id => Ok(link),
            _ => Err(AppError::LinkNotFound(link_id)),
        }
    }

    /// Get a link with its tags.
    pub async fn get(&self, user_id: i32, link_id: i32) -> AppResult<LinkWithTags> {
        let link = self.get_owned(user_id, link_id).await?;
        let tags = self.tag_repo.find_by_link(link.id).await?;
        Ok(LinkWithTags { link, tags })
    }

    /// List a user's links with their tags.
    pub async fn list(&self, user_id: i32, query: &ListLinksQuery) -> AppResult<Vec<LinkWithTags>> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);
        let offset = query.offset.unwrap_or(0);
        let order = match query.kind {
            ListKind::All => LinkOrder::Created,
            ListKind::Recent => LinkOrder::LastViewed,
        };
        let filter = LinkFilter {
            platform: query
                .platform
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_lowercase),
            category: query
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        };

        let links = self
            .link_repo
            .find_by_user(user_id, &filter, order, limit, offset)
            .await?;

        let ids: Vec<i32> = links.iter().map(|l| l.id).collect();
        let mut tags_by_link: HashMap<i32, Vec<tag::Model>> = HashMap::new();
        for tag in self.tag_repo.find_by_links(&ids).await? {
            tags_by_link.entry(tag.link_id).or_default().push(tag);
        }

        Ok(links
            .into_iter()
            .map(|link| {
                let tags = tags_by_link.remove(&link.id).unwrap_or_default();
                LinkWithTags { link, tags }
            })
            .collect())
    }

    /// Delete a link and its tags.
    pub async fn delete(&self, user_id: i32, link_id: i32) -> AppResult<()> {
        let link = self.get_owned(user_id, link_id).await?;
        self.link_repo.delete(link.id).await?;
        info!(link_id, user_id, "Link deleted");
        Ok(())
    }

    /// Record a view (bumps `last_viewed`).
    pub async fn record_view(&self, user_id: i32, link_id: i32) -> AppResult<link::Model> {
        let link = self.get_owned(user_id, link_id).await?;
        self.link_repo.update_last_viewed(link.id).await
    }

    /// Change a link's category.
    pub async fn update_category(
        &self,
        user_id: i32,
        link_id: i32,
        category: &str,
    ) -> AppResult<link::Model> {
        let category = category.trim();
        if category.is_empty() || category.chars().count() > MAX_CATEGORY_LEN {
            return Err(AppError::Validation(format!(
                "Category must be between 1 and {MAX_CATEGORY_LEN} characters"
            )));
        }

        let link = self.get_owned(user_id, link_id).await?;
        self.link_repo
            .update_category(link.id, category.to_string())
            .await
    }
}
