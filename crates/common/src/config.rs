//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// LLM classification configuration.
    #[serde(default)]
    pub ai: AiConfig,
    /// oEmbed metadata lookup configuration.
    #[serde(default)]
    pub oembed: OEmbedConfig,
    /// Link ingestion policy.
    #[serde(default)]
    pub ingestion: IngestionConfig,
    /// Log output configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Chat-completion endpoint used by the content classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key. Classification is disabled (defaults only) when unset.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_ai_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_ai_base_url(),
            model: default_ai_model(),
            timeout_secs: default_ai_timeout_secs(),
        }
    }
}

/// oEmbed lookup configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OEmbedConfig {
    /// User agent sent to oEmbed endpoints.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds.
    #[serde(default = "default_oembed_timeout_secs")]
    pub timeout_secs: u64,
    /// Facebook Graph access token for the Instagram oEmbed endpoint.
    #[serde(default)]
    pub instagram_access_token: Option<String>,
}

impl Default for OEmbedConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_oembed_timeout_secs(),
            instagram_access_token: None,
        }
    }
}

/// Which platforms the ingestion pipeline accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationProfile {
    /// Only TikTok, YouTube and Instagram.
    #[default]
    Strict,
    /// Any detected platform, falling back to `webpage`.
    Permissive,
}

/// Link ingestion policy.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestionConfig {
    /// Platform validation profile.
    #[serde(default)]
    pub profile: ValidationProfile,
    /// Maximum number of links a free-tier user may save.
    #[serde(default = "default_free_tier_limit")]
    pub free_tier_limit: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            profile: ValidationProfile::default(),
            free_tier_limit: default_free_tier_limit(),
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_request_timeout_secs() -> u64 {
    60
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

fn default_ai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ai_model() -> String {
    "gpt-4o-mini".to_string()
}

const fn default_ai_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    concat!("reelshelf/", env!("CARGO_PKG_VERSION")).to_string()
}

const fn default_oembed_timeout_secs() -> u64 {
    5
}

const fn default_free_tier_limit() -> u64 {
    50
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present, into the process environment)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `REELSHELF_ENV`)
    /// 4. Environment variables with `REELSHELF__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("REELSHELF_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("REELSHELF")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("REELSHELF")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Build a configuration for tests and tooling with every default applied.
    #[must_use]
    pub fn with_database_url(url: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: url.into(),
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
            },
            ai: AiConfig::default(),
            oembed: OEmbedConfig::default(),
            ingestion: IngestionConfig::default(),
            log: LogConfig::default(),
        }
    }
}
