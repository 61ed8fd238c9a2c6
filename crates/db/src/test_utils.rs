//! Test utilities for database operations.
//!
//! Provides throwaway migrated Postgres databases for integration tests,
//! plus model fixtures for mock-database tests.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::migrations::Migrator;

/// Test database configuration.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database username.
    pub username: String,
    /// Database password.
    pub password: String,
    /// Database name.
    pub database: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("TEST_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: std::env::var("TEST_DB_USER").unwrap_or_else(|_| "reelshelf_test".to_string()),
            password: std::env::var("TEST_DB_PASSWORD")
                .unwrap_or_else(|_| "reelshelf_test".to_string()),
            database: std::env::var("TEST_DB_NAME").unwrap_or_else(|_| "reelshelf_test".to_string()),
        }
    }
}

impl TestDbConfig {
    /// Get the database URL.
    #[must_use]
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }

    /// Get URL for connecting to postgres database (for creating test DB).
    #[must_use]
    pub fn postgres_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/postgres",
            self.username, self.password, self.host, self.port
        )
    }
}

/// A throwaway Postgres database with every migration applied.
///
/// Each instance gets its own uniquely named database so integration tests
/// can run in parallel.
pub struct TestDatabase {
    /// Shared connection, ready to hand to repositories.
    pub conn: Arc<DatabaseConnection>,
    /// Settings the database was created with.
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Connect to the configured database without creating or migrating it.
    pub async fn connect(config: &TestDbConfig) -> Result<DatabaseConnection, DbErr> {
        let conn = Database::connect(&config.database_url()).await?;
        info!(database = %config.database, "Connected to test database");
        Ok(conn)
    }

    /// Create a uniquely named database and run all migrations on it.
    pub async fn create_migrated() -> Result<Self, DbErr> {
        let mut config = TestDbConfig::default();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        config.database = format!("reelshelf_test_{}", &suffix[..8]);

        let admin = Database::connect(&config.postgres_url()).await?;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("CREATE DATABASE \"{}\"", config.database),
            ))
            .await?;
        admin.close().await?;

        let conn = Self::connect(&config).await?;
        Migrator::up(&conn, None).await?;
        info!(database = %config.database, "Created and migrated test database");

        Ok(Self {
            conn: Arc::new(conn),
            config,
        })
    }

    /// Drop the database. Repositories holding the connection must be
    /// dropped first or their sessions are terminated.
    pub async fn drop_database(self) -> Result<(), DbErr> {
        if let Ok(conn) = Arc::try_unwrap(self.conn) {
            conn.close().await?;
        }

        let admin = Database::connect(&self.config.postgres_url()).await?;
        // Best effort; the drop below reports anything that still blocks it.
        let _ = admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!(
                    "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}'",
                    self.config.database
                ),
            ))
            .await;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("DROP DATABASE IF EXISTS \"{}\"", self.config.database),
            ))
            .await?;
        admin.close().await?;

        info!(database = %self.config.database, "Dropped test database");
        Ok(())
    }
}

/// Model builders for mock-database tests.
pub mod fixtures {
    use chrono::{TimeZone, Utc};
    use sea_orm::prelude::DateTimeWithTimeZone;

    use crate::entities::{custom_tab, link, link_tab, tag, user};

    /// Fixed timestamp so fixtures compare equal across calls.
    #[must_use]
    pub fn timestamp() -> DateTimeWithTimeZone {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
            .into()
    }

    /// A user with token `token-<username>`.
    #[must_use]
    pub fn user(id: i32, username: &str, is_premium: bool) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            token: Some(format!("token-{username}")),
            is_premium,
            display_name: None,
            bio: None,
            avatar_url: None,
            created_at: timestamp(),
            updated_at: None,
        }
    }

    /// An unclassified TikTok link.
    #[must_use]
    pub fn link(id: i32, user_id: i32, url: &str) -> link::Model {
        link::Model {
            id,
            url: url.to_string(),
            title: format!("Saved link {id}"),
            platform: "tiktok".to_string(),
            thumbnail_url: None,
            category: "Uncategorized".to_string(),
            duration: None,
            user_id,
            created_at: timestamp(),
            last_viewed: timestamp(),
            metadata: None,
        }
    }

    /// A tag on a link.
    #[must_use]
    pub fn tag(id: i32, link_id: i32, name: &str) -> tag::Model {
        tag::Model {
            id,
            name: name.to_string(),
            link_id,
            created_at: timestamp(),
        }
    }

    /// A custom tab without a description.
    #[must_use]
    pub fn custom_tab(id: i32, user_id: i32, name: &str) -> custom_tab::Model {
        custom_tab::Model {
            id,
            user_id,
            name: name.to_string(),
            description: None,
            created_at: timestamp(),
        }
    }

    /// A tab membership row.
    #[must_use]
    pub fn link_tab(id: i32, tab_id: i32, link_id: i32) -> link_tab::Model {
        link_tab::Model {
            id,
            link_id,
            tab_id,
            created_at: timestamp(),
        }
    }
}
