//! Library analytics.

use reelshelf_common::AppResult;
use reelshelf_db::repositories::{GroupCount, LinkRepository, UserRepository};
use serde::Serialize;

use super::quota::{QuotaService, QuotaStatus};
use super::tag::{TagCount, TagService};

/// Number of tags reported in a summary.
const TOP_TAGS: u64 = 10;

/// Links per platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformCount {
    pub platform: String,
    pub count: i64,
}

/// Links per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Overview of a user's saved library.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySummary {
    pub total_links: u64,
    pub by_platform: Vec<PlatformCount>,
    pub by_category: Vec<CategoryCount>,
    pub top_tags: Vec<TagCount>,
    pub quota: QuotaStatus,
}

/// Aggregates counts over a user's library.
#[derive(Clone)]
pub struct AnalyticsService {
    user_repo: UserRepository,
    link_repo: LinkRepository,
    tag_service: TagService,
    quota: QuotaService,
}

impl AnalyticsService {
    /// Create an analytics service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        link_repo: LinkRepository,
        tag_service: TagService,
        quota: QuotaService,
    ) -> Self {
        Self {
            user_repo,
            link_repo,
            tag_service,
            quota,
        }
    }

    /// Summarize the user's library.
    pub async fn summary(&self, user_id: i32) -> AppResult<LibrarySummary> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let total_links = self.link_repo.count_by_user(user_id).await?;
        let by_platform = self
            .link_repo
            .count_by_platform(user_id)
            .await?
            .into_iter()
            .map(|GroupCount { key, count }| PlatformCount {
                platform: key,
                count,
            })
            .collect();
        let by_category = self
            .link_repo
            .count_by_category(user_id)
            .await?
            .into_iter()
            .map(|GroupCount { key, count }| CategoryCount {
                category: key,
                count,
            })
            .collect();
        let top_tags = self.tag_service.popular_for_user(user_id, TOP_TAGS).await?;
        let quota = self.quota.status_for(&user).await?;

        Ok(LibrarySummary {
            total_links,
            by_platform,
            by_category,
            top_tags,
            quota,
        })
    }
}
