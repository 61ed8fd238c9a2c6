//! Free-tier quota gate.

use reelshelf_common::{AppError, AppResult};
use reelshelf_db::{entities::user, repositories::{LinkRepository, UserRepository}};
use serde::Serialize;

/// Quota state for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub allowed: bool,
    pub is_premium: bool,
    /// Links saved so far. Not counted for premium users.
    pub used: Option<u64>,
    pub limit: u64,
}

/// Decides whether a user may save another link.
#[derive(Clone)]
pub struct QuotaService {
    user_repo: UserRepository,
    link_repo: LinkRepository,
    free_tier_limit: u64,
}

impl QuotaService {
    /// Create a quota service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        link_repo: LinkRepository,
        free_tier_limit: u64,
    ) -> Self {
        Self {
            user_repo,
            link_repo,
            free_tier_limit,
        }
    }

    /// Configured free-tier limit.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.free_tier_limit
    }

    /// Quota state for a user that was already loaded.
    pub async fn status_for(&self, user: &user::Model) -> AppResult<QuotaStatus> {
        if user.is_premium {
            return Ok(QuotaStatus {
                allowed: true,
                is_premium: true,
                used: None,
                limit: self.free_tier_limit,
            });
        }

        let used = self.link_repo.count_by_user(user.id).await?;
        Ok(QuotaStatus {
            allowed: used < self.free_tier_limit,
            is_premium: false,
            used: Some(used),
            limit: self.free_tier_limit,
        })
    }

    /// Quota state for a user.
    pub async fn status(&self, user_id: i32) -> AppResult<QuotaStatus> {
        let user = self.user_repo.get_by_id(user_id).await?;
        self.status_for(&user).await
    }

    /// Whether the user may save another link.
    pub async fn check_quota(&self, user_id: i32) -> AppResult<bool> {
        Ok(self.status(user_id).await?.allowed)
    }

    /// Reject with `QuotaExceeded` unless the user may save another link.
    pub async fn ensure_allowed(&self, user: &user::Model) -> AppResult<QuotaStatus> {
        let status = self.status_for(user).await?;
        if status.allowed {
            Ok(status)
        } else {
            Err(AppError::QuotaExceeded {
                limit: status.limit,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reelshelf_db::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> QuotaService {
        let db = Arc::new(db);
        QuotaService::new(
            UserRepository::new(db.clone()),
            LinkRepository::new(db),
            50,
        )
    }

    fn count_row(n: i64) -> Vec<std::collections::BTreeMap<&'static str, sea_orm::Value>> {
        vec![maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }]
    }

    #[tokio::test]
    async fn test_free_user_under_limit_allowed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::user(1, "alice", false)]])
            .append_query_results([count_row(49)])
            .into_connection();

        let status = service(db).status(1).await.unwrap();

        assert!(status.allowed);
        assert_eq!(status.used, Some(49));
        assert_eq!(status.limit, 50);
    }

    #[tokio::test]
    async fn test_free_user_at_limit_denied() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::user(1, "alice", false)]])
            .append_query_results([count_row(50)])
            .into_connection();

        assert!(!service(db).check_quota(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_premium_user_skips_count() {
        // Only the user row is queued: a count query would fail.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::user(2, "bob", true)]])
            .into_connection();

        let status = service(db).status(2).await.unwrap();

        assert!(status.allowed);
        assert!(status.is_premium);
        assert_eq!(status.used, None);
    }

    #[tokio::test]
    async fn test_ensure_allowed_rejects_with_limit() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_row(75)])
            .into_connection();

        let user = fixtures::user(1, "alice", false);
        let result = service(db).ensure_allowed(&user).await;

        assert!(matches!(result, Err(AppError::QuotaExceeded { limit: 50 })));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        assert!(matches!(
            service(db).status(9).await,
            Err(AppError::UserNotFound(_))
        ));
    }
}
