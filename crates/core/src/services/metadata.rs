//! Metadata extraction (title and thumbnail) via oEmbed.
//!
//! Extraction never fails: every error is logged and the extractor falls
//! back to URL heuristics.

use std::sync::Arc;

use async_trait::async_trait;
use reelshelf_common::{AppError, AppResult, HttpClientConfig, config::OEmbedConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::platform::{Platform, extract_default_title_from_url, extract_video_id};

/// Resolved link metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    pub thumbnail_url: Option<String>,
    /// Uploader name reported by oEmbed, if any.
    pub author_name: Option<String>,
    /// `true` when `title` came from oEmbed rather than URL heuristics.
    pub title_from_oembed: bool,
}

impl Metadata {
    fn heuristic(url: &str) -> Self {
        Self {
            title: extract_default_title_from_url(url),
            thumbnail_url: None,
            author_name: None,
            title_from_oembed: false,
        }
    }
}

/// The subset of an oEmbed response we read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OEmbedResponse {
    pub title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub author_name: Option<String>,
}

/// Fetches an oEmbed document.
#[async_trait]
pub trait OEmbedFetcher: Send + Sync {
    /// GET the given endpoint URL and decode the JSON body.
    async fn fetch(&self, endpoint: &str) -> AppResult<OEmbedResponse>;
}

/// `reqwest`-backed oEmbed fetcher.
#[derive(Clone)]
pub struct HttpOEmbedFetcher {
    client: reqwest::Client,
}

impl HttpOEmbedFetcher {
    /// Create a fetcher with the configured user agent and timeout.
    pub fn new(config: &OEmbedConfig) -> AppResult<Self> {
        let client = HttpClientConfig::new(&config.user_agent, config.timeout_secs).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl OEmbedFetcher for HttpOEmbedFetcher {
    async fn fetch(&self, endpoint: &str) -> AppResult<OEmbedResponse> {
        let response = self
            .client
            .get(endpoint)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("oEmbed request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "oEmbed endpoint returned {}",
                response.status()
            )));
        }

        response
            .json::<OEmbedResponse>()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid oEmbed response: {e}")))
    }
}

/// Per-platform extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataStrategy {
    TikTok,
    YouTube,
    Instagram,
    Vimeo,
    Twitter,
    Reddit,
}

impl MetadataStrategy {
    /// Strategy for a platform, if it has one.
    #[must_use]
    pub const fn for_platform(platform: Platform) -> Option<Self> {
        match platform {
            Platform::TikTok => Some(Self::TikTok),
            Platform::YouTube => Some(Self::YouTube),
            Platform::Instagram => Some(Self::Instagram),
            Platform::Vimeo => Some(Self::Vimeo),
            Platform::Twitter => Some(Self::Twitter),
            Platform::Reddit => Some(Self::Reddit),
            _ => None,
        }
    }

    const fn endpoint_base(self) -> &'static str {
        match self {
            Self::TikTok => "https://www.tiktok.com/oembed?url=",
            Self::YouTube => "https://www.youtube.com/oembed?format=json&url=",
            Self::Instagram => "https://graph.facebook.com/v18.0/instagram_oembed?url=",
            Self::Vimeo => "https://vimeo.com/api/oembed.json?url=",
            Self::Twitter => "https://publish.twitter.com/oembed?url=",
            Self::Reddit => "https://www.reddit.com/oembed?url=",
        }
    }

    /// Full oEmbed URL for a link.
    ///
    /// Instagram requires a Graph access token; without one there is no
    /// endpoint.
    #[must_use]
    pub fn oembed_endpoint(self, url: &str, instagram_token: Option<&str>) -> Option<String> {
        let endpoint = format!("{}{}", self.endpoint_base(), urlencoding::encode(url));
        match self {
            Self::Instagram => instagram_token.map(|token| {
                format!("{endpoint}&access_token={}", urlencoding::encode(token))
            }),
            _ => Some(endpoint),
        }
    }

    /// Thumbnail derivable from the URL alone.
    #[must_use]
    pub fn fallback_thumbnail(self, url: &str) -> Option<String> {
        match self {
            Self::YouTube => extract_video_id(url, Platform::YouTube)
                .map(|id| format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg")),
            Self::Instagram => extract_video_id(url, Platform::Instagram)
                .map(|code| format!("https://www.instagram.com/p/{code}/media/?size=l")),
            _ => None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Resolves title and thumbnail for a link.
#[derive(Clone)]
pub struct MetadataExtractor {
    fetcher: Arc<dyn OEmbedFetcher>,
    instagram_access_token: Option<String>,
}

impl MetadataExtractor {
    /// Create an extractor.
    #[must_use]
    pub fn new(fetcher: Arc<dyn OEmbedFetcher>, config: &OEmbedConfig) -> Self {
        Self {
            fetcher,
            instagram_access_token: config.instagram_access_token.clone(),
        }
    }

    /// Resolve metadata for a URL. Never fails.
    pub async fn extract(&self, url: &str, platform: Platform) -> Metadata {
        let Some(strategy) = MetadataStrategy::for_platform(platform) else {
            debug!(%platform, "No metadata strategy, using URL heuristics");
            return Metadata::heuristic(url);
        };

        let oembed = match strategy.oembed_endpoint(url, self.instagram_access_token.as_deref()) {
            Some(endpoint) => match self.fetcher.fetch(&endpoint).await {
                Ok(response) => Some(response),
                Err(e) => {
                    warn!(error = %e, %platform, url = %url, "oEmbed lookup failed");
                    None
                }
            },
            None => {
                debug!(%platform, "oEmbed endpoint unavailable");
                None
            }
        };

        let mut metadata = Metadata::heuristic(url);

        if let Some(response) = oembed {
            if let Some(title) = non_blank(response.title) {
                metadata.title = title;
                metadata.title_from_oembed = true;
            }
            metadata.thumbnail_url = non_blank(response.thumbnail_url);
            metadata.author_name = non_blank(response.author_name);
        }

        if metadata.thumbnail_url.is_none() {
            metadata.thumbnail_url = strategy.fallback_thumbnail(url);
        }

        debug!(
            %platform,
            title_from_oembed = metadata.title_from_oembed,
            has_thumbnail = metadata.thumbnail_url.is_some(),
            "Metadata resolved"
        );

        metadata
    }
}
