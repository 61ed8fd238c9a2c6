//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use reelshelf_common::Config;
use reelshelf_core::{
    AnalyticsService, ClassifierService, CompletionProvider, CustomTabService, IngestionService,
    LinkService, MetadataExtractor, OEmbedFetcher, QuotaService, TagService, UserService,
};
use reelshelf_db::repositories::{
    CustomTabRepository, LinkRepository, TagRepository, UserRepository,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub ingestion_service: IngestionService,
    pub link_service: LinkService,
    pub quota_service: QuotaService,
    pub tag_service: TagService,
    pub custom_tab_service: CustomTabService,
    pub analytics_service: AnalyticsService,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    ///
    /// The two outbound seams are passed in so the server can hand over
    /// HTTP-backed implementations and tests can hand over stubs.
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: &Config,
        fetcher: Arc<dyn OEmbedFetcher>,
        completion: Option<Arc<dyn CompletionProvider>>,
    ) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let link_repo = LinkRepository::new(Arc::clone(&db));
        let tag_repo = TagRepository::new(Arc::clone(&db));
        let tab_repo = CustomTabRepository::new(db);

        let quota_service = QuotaService::new(
            user_repo.clone(),
            link_repo.clone(),
            config.ingestion.free_tier_limit,
        );
        let tag_service = TagService::new(tag_repo.clone(), link_repo.clone());
        let ingestion_service = IngestionService::new(
            user_repo.clone(),
            link_repo.clone(),
            tag_repo.clone(),
            quota_service.clone(),
            MetadataExtractor::new(fetcher, &config.oembed),
            ClassifierService::new(completion),
            config.ingestion.profile,
        );
        let analytics_service = AnalyticsService::new(
            user_repo.clone(),
            link_repo.clone(),
            tag_service.clone(),
            quota_service.clone(),
        );

        Self {
            user_service: UserService::new(user_repo),
            ingestion_service,
            link_service: LinkService::new(link_repo.clone(), tag_repo),
            quota_service,
            tag_service,
            custom_tab_service: CustomTabService::new(tab_repo, link_repo),
            analytics_service,
        }
    }
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to a user and stores it in the
/// request extensions. Requests without a valid token pass through; handlers
/// that need a user reject them via [`crate::extractors::AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token.trim()).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => tracing::debug!(error = %e, "Bearer token rejected"),
        }
    }

    next.run(req).await
}
