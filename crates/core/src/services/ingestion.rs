//! Link ingestion pipeline.
//!
//! `ingest` walks a submitted URL through platform resolution, the quota
//! gate, the duplicate gate, the URL cache (or extractor + classifier on a
//! miss), then persists the link and its tags. External calls happen only
//! after every gate has passed.

use reelshelf_common::{AppError, AppResult, ValidationProfile};
use reelshelf_db::repositories::{LinkRepository, NewLink, TagRepository, UserRepository};
use serde::Deserialize;
use tracing::{debug, info};

use super::classifier::{Classification, ClassifierService};
use super::link::LinkWithTags;
use super::metadata::MetadataExtractor;
use super::platform::{Platform, resolve_platform};
use super::quota::QuotaService;

/// A link submission.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestLinkInput {
    pub url: String,
    /// Save even if the user already has this exact URL.
    #[serde(default)]
    pub force: bool,
}

/// Classification and thumbnail resolved for a submission.
struct Resolved {
    classification: Classification,
    thumbnail_url: Option<String>,
    cache_hit: bool,
}

/// Orchestrates link ingestion.
#[derive(Clone)]
pub struct IngestionService {
    user_repo: UserRepository,
    link_repo: LinkRepository,
    tag_repo: TagRepository,
    quota: QuotaService,
    extractor: MetadataExtractor,
    classifier: ClassifierService,
    profile: ValidationProfile,
}

impl IngestionService {
    /// Create a new ingestion service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        link_repo: LinkRepository,
        tag_repo: TagRepository,
        quota: QuotaService,
        extractor: MetadataExtractor,
        classifier: ClassifierService,
        profile: ValidationProfile,
    ) -> Self {
        Self {
            user_repo,
            link_repo,
            tag_repo,
            quota,
            extractor,
            classifier,
            profile,
        }
    }

    /// Ingest a link for a user.
    pub async fn ingest(&self, user_id: i32, input: IngestLinkInput) -> AppResult<LinkWithTags> {
        let url = input.url.trim();
        if url.is_empty() {
            return Err(AppError::Validation("URL is required".to_string()));
        }

        let platform = resolve_platform(url, self.profile)?;
        debug!(user_id, %platform, "Platform resolved");

        let user = self.user_repo.get_by_id(user_id).await?;
        let quota = self.quota.ensure_allowed(&user).await?;
        debug!(user_id, used = ?quota.used, limit = quota.limit, "Quota checked");

        if !input.force
            && let Some(existing) = self.link_repo.find_by_user_and_url(user_id, url).await?
        {
            debug!(user_id, existing_id = existing.id, "Duplicate link rejected");
            return Err(AppError::DuplicateLink {
                existing_id: existing.id,
            });
        }

        let resolved = self.resolve(url, platform).await?;

        let link = self
            .link_repo
            .create(NewLink {
                url: url.to_string(),
                title: resolved.classification.title.clone(),
                platform: platform.as_str().to_string(),
                thumbnail_url: resolved.thumbnail_url,
                category: resolved.classification.category.clone(),
                duration: resolved.classification.duration,
                user_id,
                metadata: Some(resolved.classification.to_value()),
            })
            .await?;
        debug!(link_id = link.id, "Link persisted");

        let mut tags = Vec::with_capacity(resolved.classification.tags.len());
        for name in resolved.classification.tags {
            tags.push(self.tag_repo.create(link.id, name).await?);
        }

        info!(
            link_id = link.id,
            user_id,
            %platform,
            cache_hit = resolved.cache_hit,
            tags = tags.len(),
            "Link ingested"
        );

        Ok(LinkWithTags { link, tags })
    }

    /// Reuse cached classifier output for this URL, or run the extractor and
    /// classifier.
    async fn resolve(&self, url: &str, platform: Platform) -> AppResult<Resolved> {
        let cached = self.link_repo.find_cached_by_url(url).await?.and_then(|row| {
            row.metadata.map(|metadata| {
                (
                    row.id,
                    Classification::from_value(&metadata, &row.title),
                    row.thumbnail_url,
                )
            })
        });

        if let Some((source_id, classification, thumbnail_url)) = cached {
            debug!(source_id, "Cache hit");
            let thumbnail_url = match thumbnail_url {
                Some(thumbnail) => Some(thumbnail),
                None => self.extractor.extract(url, platform).await.thumbnail_url,
            };
            return Ok(Resolved {
                classification,
                thumbnail_url,
                cache_hit: true,
            });
        }

        let metadata = self.extractor.extract(url, platform).await;
        let classification = self
            .classifier
            .classify(
                url,
                platform,
                &metadata.title,
                metadata.author_name.as_deref(),
            )
            .await;

        Ok(Resolved {
            classification,
            thumbnail_url: metadata.thumbnail_url,
            cache_hit: false,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::testing::{MockFetcher, MockProvider};
    use reelshelf_common::config::OEmbedConfig;
    use reelshelf_db::entities::link;
    use reelshelf_db::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    const TIKTOK_URL: &str = "https://www.tiktok.com/@demo/video/123";

    fn service(
        db: Arc<DatabaseConnection>,
        fetcher: Arc<MockFetcher>,
        provider: Arc<MockProvider>,
    ) -> IngestionService {
        let user_repo = UserRepository::new(db.clone());
        let link_repo = LinkRepository::new(db.clone());
        IngestionService::new(
            user_repo.clone(),
            link_repo.clone(),
            TagRepository::new(db),
            QuotaService::new(user_repo, link_repo, 50),
            MetadataExtractor::new(fetcher, &OEmbedConfig::default()),
            ClassifierService::new(Some(provider)),
            ValidationProfile::Strict,
        )
    }

    fn count_row(n: i64) -> Vec<BTreeMap<&'static str, sea_orm::Value>> {
        vec![maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }]
    }

    fn input(url: &str, force: bool) -> IngestLinkInput {
        IngestLinkInput {
            url: url.to_string(),
            force,
        }
    }

    fn cached_link(id: i32, url: &str, thumbnail: Option<&str>) -> link::Model {
        let mut row = fixtures::link(id, 99, url);
        row.title = "X".to_string();
        row.category = "Cooking".to_string();
        row.thumbnail_url = thumbnail.map(str::to_string);
        row.metadata = Some(serde_json::json!({
            "title": "X",
            "category": "Cooking",
            "tags": ["pasta", "easy"],
            "duration": null
        }));
        row
    }

    fn transaction_log(db: Arc<DatabaseConnection>) -> String {
        let db = Arc::try_unwrap(db).unwrap_or_else(|_| panic!("connection still shared"));
        format!("{:?}", db.into_transaction_log())
    }

    #[tokio::test]
    async fn test_degrades_when_extractor_and_classifier_fail() {
        let mut saved = fixtures::link(1, 1, TIKTOK_URL);
        saved.title = "TikTok video by @demo".to_string();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::user(1, "alice", false)]])
                .append_query_results([count_row(3)])
                .append_query_results([Vec::<link::Model>::new()])
                .append_query_results([Vec::<link::Model>::new()])
                .append_query_results([[saved]])
                .into_connection(),
        );
        let fetcher = MockFetcher::failing();
        let provider = MockProvider::failing();

        let result = service(db.clone(), fetcher.clone(), provider.clone())
            .ingest(1, input(TIKTOK_URL, false))
            .await
            .unwrap();

        assert!(result.tags.is_empty());
        assert_eq!(fetcher.calls().len(), 1);
        assert_eq!(provider.prompts().len(), 1);

        let log = transaction_log(db);
        assert!(log.contains("TikTok video by @demo"));
        assert!(log.contains("Uncategorized"));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_classifier() {
        let url = "https://www.youtube.com/shorts/abcdefghijk";
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::user(1, "alice", false)]])
                .append_query_results([count_row(0)])
                .append_query_results([Vec::<link::Model>::new()])
                .append_query_results([[cached_link(7, url, Some("https://cdn.example/t.jpg"))]])
                .append_query_results([[cached_link(8, url, Some("https://cdn.example/t.jpg"))]])
                .append_query_results([[fixtures::tag(1, 8, "pasta")]])
                .append_query_results([[fixtures::tag(2, 8, "easy")]])
                .into_connection(),
        );
        let fetcher = MockFetcher::failing();
        let provider = MockProvider::failing();

        let result = service(db.clone(), fetcher.clone(), provider.clone())
            .ingest(1, input(url, false))
            .await
            .unwrap();

        assert!(provider.prompts().is_empty());
        assert!(fetcher.calls().is_empty());
        let names: Vec<&str> = result.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["pasta", "easy"]);

        let log = transaction_log(db);
        assert!(log.contains("Cooking"));
        assert!(log.contains("https://cdn.example/t.jpg"));
    }

    #[tokio::test]
    async fn test_cache_hit_without_thumbnail_backfills() {
        let url = "https://www.youtube.com/shorts/abcdefghijk";
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::user(2, "bob", true)]])
                .append_query_results([Vec::<link::Model>::new()])
                .append_query_results([[cached_link(7, url, None)]])
                .append_query_results([[cached_link(8, url, None)]])
                .append_query_results([[fixtures::tag(1, 8, "pasta")]])
                .append_query_results([[fixtures::tag(2, 8, "easy")]])
                .into_connection(),
        );
        let fetcher = MockFetcher::ok(Some("Another title"), Some("https://cdn.example/new.jpg"));
        let provider = MockProvider::failing();

        service(db.clone(), fetcher.clone(), provider.clone())
            .ingest(2, input(url, false))
            .await
            .unwrap();

        assert_eq!(fetcher.calls().len(), 1);
        assert!(provider.prompts().is_empty());

        let log = transaction_log(db);
        assert!(log.contains("https://cdn.example/new.jpg"));
        assert!(!log.contains("Another title"));
    }

    #[tokio::test]
    async fn test_quota_exceeded_before_external_calls() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::user(1, "alice", false)]])
                .append_query_results([count_row(50)])
                .into_connection(),
        );
        let fetcher = MockFetcher::failing();
        let provider = MockProvider::failing();

        let result = service(db, fetcher.clone(), provider.clone())
            .ingest(1, input(TIKTOK_URL, false))
            .await;

        assert!(matches!(result, Err(AppError::QuotaExceeded { limit: 50 })));
        assert!(fetcher.calls().is_empty());
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_premium_user_bypasses_quota() {
        let mut saved = fixtures::link(1, 2, TIKTOK_URL);
        saved.title = "Pasta".to_string();

        // No count row queued: premium users are never counted.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::user(2, "bob", true)]])
                .append_query_results([Vec::<link::Model>::new()])
                .append_query_results([Vec::<link::Model>::new()])
                .append_query_results([[saved]])
                .append_query_results([[fixtures::tag(1, 1, "pasta")]])
                .into_connection(),
        );
        let provider =
            MockProvider::replying(r#"{"title":"Pasta","category":"Cooking","tags":["pasta"]}"#);

        let result = service(db, MockFetcher::failing(), provider)
            .ingest(2, input(TIKTOK_URL, false))
            .await
            .unwrap();

        assert_eq!(result.tags.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_rejected_without_force() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::user(1, "alice", false)]])
                .append_query_results([count_row(1)])
                .append_query_results([[fixtures::link(42, 1, TIKTOK_URL)]])
                .into_connection(),
        );
        let fetcher = MockFetcher::failing();

        let result = service(db, fetcher.clone(), MockProvider::failing())
            .ingest(1, input(TIKTOK_URL, false))
            .await;

        assert!(matches!(
            result,
            Err(AppError::DuplicateLink { existing_id: 42 })
        ));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_force_creates_second_row() {
        let url = "https://www.youtube.com/shorts/abcdefghijk";
        // No duplicate lookup with force; the cache finds the user's own row.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::user(1, "alice", false)]])
                .append_query_results([count_row(1)])
                .append_query_results([[cached_link(42, url, Some("https://cdn.example/t.jpg"))]])
                .append_query_results([[cached_link(43, url, Some("https://cdn.example/t.jpg"))]])
                .append_query_results([[fixtures::tag(1, 43, "pasta")]])
                .append_query_results([[fixtures::tag(2, 43, "easy")]])
                .into_connection(),
        );

        let result = service(db, MockFetcher::failing(), MockProvider::failing())
            .ingest(1, input(url, true))
            .await
            .unwrap();

        assert_eq!(result.link.id, 43);
        assert_eq!(result.tags.len(), 2);
    }

    #[tokio::test]
    async fn test_unsupported_platform_rejected_before_db() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db, MockFetcher::failing(), MockProvider::failing())
            .ingest(1, input("https://vimeo.com/123", false))
            .await;

        assert!(matches!(result, Err(AppError::UnsupportedPlatform(_))));
    }

    #[tokio::test]
    async fn test_blank_url_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db, MockFetcher::failing(), MockProvider::failing())
            .ingest(1, input("   ", false))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_tags_persisted_in_classifier_order() {
        let saved = fixtures::link(1, 1, TIKTOK_URL);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::user(1, "alice", false)]])
                .append_query_results([count_row(0)])
                .append_query_results([Vec::<link::Model>::new()])
                .append_query_results([Vec::<link::Model>::new()])
                .append_query_results([[saved]])
                .append_query_results([[fixtures::tag(1, 1, "abs")]])
                .append_query_results([[fixtures::tag(2, 1, "core")]])
                .into_connection(),
        );
        let provider = MockProvider::replying(
            r##"{"title":"Core","category":"Fitness","tags":["#Abs","core","abs"],"duration":"40"}"##,
        );

        let result = service(db.clone(), MockFetcher::failing(), provider)
            .ingest(1, input(TIKTOK_URL, false))
            .await
            .unwrap();

        assert_eq!(result.tags.len(), 2);

        let log = transaction_log(db);
        assert!(log.contains("Fitness"));
        assert!(log.contains("core"));
        assert!(!log.contains("#Abs"));
    }

    #[tokio::test]
    async fn test_overlong_classifier_tag_not_inserted() {
        let too_long = "a".repeat(120);
        let saved = fixtures::link(1, 1, TIKTOK_URL);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::user(1, "alice", false)]])
                .append_query_results([count_row(0)])
                .append_query_results([Vec::<link::Model>::new()])
                .append_query_results([Vec::<link::Model>::new()])
                .append_query_results([[saved]])
                .append_query_results([[fixtures::tag(1, 1, "pasta")]])
                .into_connection(),
        );
        let provider = MockProvider::replying(&format!(
            r#"{{"category":"Cooking","tags":["{too_long}","pasta"]}}"#
        ));

        let result = service(db.clone(), MockFetcher::failing(), provider)
            .ingest(1, input(TIKTOK_URL, false))
            .await
            .unwrap();

        assert_eq!(result.tags.len(), 1);
        assert!(!transaction_log(db).contains(&too_long));
    }
}
