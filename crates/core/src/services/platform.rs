//! Platform detection and URL heuristics.
//!
//! Everything here is pure: no I/O, no errors escaping as panics. Detection
//! lowercases the URL and walks an ordered rule list, first match wins.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use reelshelf_common::{AppError, AppResult, ValidationProfile};
use serde::{Deserialize, Serialize};
use url::Url;

/// Title used when nothing better can be derived from a URL.
pub const UNTITLED: &str = "Untitled Content";

static YOUTUBE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid regex"));

static TIKTOK_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/video/(\d+)").expect("valid regex"));

static INSTAGRAM_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

/// Source platform of a saved link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    // Video
    TikTok,
    YouTube,
    Instagram,
    Facebook,
    Vimeo,
    // Social
    Twitter,
    LinkedIn,
    Reddit,
    // Content
    Medium,
    Substack,
    GitHub,
    // Generic
    Document,
    Article,
    Webpage,
}

impl Platform {
    /// Every platform, in detection order.
    pub const ALL: [Self; 14] = [
        Self::TikTok,
        Self::YouTube,
        Self::Instagram,
        Self::Facebook,
        Self::Vimeo,
        Self::Twitter,
        Self::LinkedIn,
        Self::Reddit,
        Self::Medium,
        Self::Substack,
        Self::GitHub,
        Self::Document,
        Self::Article,
        Self::Webpage,
    ];

    /// Lowercase tag stored in the `platform` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TikTok => "tiktok",
            Self::YouTube => "youtube",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::Vimeo => "vimeo",
            Self::Twitter => "twitter",
            Self::LinkedIn => "linkedin",
            Self::Reddit => "reddit",
            Self::Medium => "medium",
            Self::Substack => "substack",
            Self::GitHub => "github",
            Self::Document => "document",
            Self::Article => "article",
            Self::Webpage => "webpage",
        }
    }

    /// TikTok, YouTube and Instagram.
    #[must_use]
    pub const fn is_short_form_video(self) -> bool {
        matches!(self, Self::TikTok | Self::YouTube | Self::Instagram)
    }

    /// Host suffixes owned by the platform. Generic platforms have none.
    const fn hosts(self) -> &'static [&'static str] {
        match self {
            Self::TikTok => &["tiktok.com"],
            Self::YouTube => &["youtube.com", "youtu.be"],
            Self::Instagram => &["instagram.com", "instagr.am"],
            Self::Facebook => &["facebook.com", "fb.watch"],
            Self::Vimeo => &["vimeo.com"],
            Self::Twitter => &["twitter.com", "x.com"],
            Self::LinkedIn => &["linkedin.com"],
            Self::Reddit => &["reddit.com", "redd.it"],
            Self::Medium => &["medium.com"],
            Self::Substack => &["substack.com"],
            Self::GitHub => &["github.com"],
            Self::Document | Self::Article | Self::Webpage => &[],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == tag)
            .ok_or_else(|| AppError::UnsupportedPlatform(s.to_string()))
    }
}

const DOCUMENT_EXTENSIONS: [&str; 8] = [
    ".pdf", ".doc", ".docx", ".ppt", ".pptx", ".xls", ".xlsx", ".txt",
];

const ARTICLE_MARKERS: [&str; 4] = ["/blog", "/article", "/news", "/post"];

/// Parse an http(s) URL with a host.
fn parse_web_url(url: &str) -> Option<Url> {
    let parsed = Url::parse(url.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(parsed),
        _ => None,
    }
}

fn host_matches(host: &str, suffix: &str) -> bool {
    host == suffix
        || host
            .strip_suffix(suffix)
            .is_some_and(|rest| rest.ends_with('.'))
}

/// Detect the platform of a URL.
///
/// Returns `None` for anything that is not a well-formed http(s) URL.
#[must_use]
pub fn detect_platform(url: &str) -> Option<Platform> {
    let parsed = parse_web_url(&url.to_lowercase())?;
    let host = parsed.host_str()?;

    if let Some(platform) = Platform::ALL
        .into_iter()
        .find(|p| p.hosts().iter().any(|suffix| host_matches(host, suffix)))
    {
        return Some(platform);
    }

    let path = parsed.path();
    if DOCUMENT_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return Some(Platform::Document);
    }
    if ARTICLE_MARKERS.iter().any(|marker| path.contains(marker)) {
        return Some(Platform::Article);
    }

    Some(Platform::Webpage)
}

/// Detect the platform and apply the validation profile.
pub fn resolve_platform(url: &str, profile: ValidationProfile) -> AppResult<Platform> {
    match (detect_platform(url), profile) {
        (Some(platform), ValidationProfile::Strict) if platform.is_short_form_video() => {
            Ok(platform)
        }
        (Some(platform), ValidationProfile::Strict) => {
            Err(AppError::UnsupportedPlatform(platform.to_string()))
        }
        (Some(platform), ValidationProfile::Permissive) => Ok(platform),
        (None, _) => Err(AppError::UnsupportedPlatform(url.to_string())),
    }
}

fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// Derive a human-readable title from a URL alone. Never empty.
#[must_use]
pub fn extract_default_title_from_url(url: &str) -> String {
    let Some(parsed) = parse_web_url(url) else {
        return UNTITLED.to_string();
    };
    let Some(platform) = detect_platform(url) else {
        return UNTITLED.to_string();
    };
    let segments = path_segments(&parsed);

    let title = match platform {
        Platform::TikTok => Some(tiktok_title(&segments)),
        Platform::YouTube => Some(youtube_title(&parsed, &segments)),
        Platform::Instagram => Some(instagram_title(&segments)),
        Platform::Twitter => match segments.as_slice() {
            [handle, "status", ..] => Some(format!("Post by @{handle} on X")),
            _ => None,
        },
        Platform::Reddit => reddit_title(&segments),
        Platform::GitHub => match segments.as_slice() {
            [owner, repo, ..] => Some(format!("{owner}/{repo} on GitHub")),
            _ => None,
        },
        _ => None,
    };

    title
        .or_else(|| generic_title(&parsed, &segments))
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn tiktok_title(segments: &[&str]) -> String {
    segments
        .iter()
        .find(|s| s.len() > 1 && s.starts_with('@'))
        .map_or_else(
            || "TikTok video".to_string(),
            |handle| format!("TikTok video by {handle}"),
        )
}

fn youtube_title(url: &Url, segments: &[&str]) -> String {
    if let ["shorts", id, ..] = segments {
        return format!("YouTube Short {id}");
    }
    if let Some(id) = extract_video_id(url.as_str(), Platform::YouTube) {
        return format!("YouTube video {id}");
    }
    match segments.first() {
        Some(channel) if channel.len() > 1 && channel.starts_with('@') => {
            format!("YouTube video by {channel}")
        }
        _ => "YouTube video".to_string(),
    }
}

fn instagram_title(segments: &[&str]) -> String {
    match segments {
        ["reel" | "reels", id, ..] => format!("Instagram Reel {id}"),
        ["p", id, ..] => format!("Instagram post {id}"),
        [handle, ..] if !matches!(*handle, "explore" | "stories" | "accounts") => {
            format!("Instagram post by @{}", handle.trim_start_matches('@'))
        }
        _ => "Instagram post".to_string(),
    }
}

fn reddit_title(segments: &[&str]) -> Option<String> {
    match segments {
        ["r", _, "comments", _, slug, ..] => humanize(slug),
        ["r", sub, ..] => Some(format!("Reddit post in r/{sub}")),
        _ => None,
    }
}

fn generic_title(url: &Url, segments: &[&str]) -> Option<String> {
    segments
        .last()
        .and_then(|segment| {
            let decoded = urlencoding::decode(segment).ok()?;
            let stem = match decoded.rsplit_once('.') {
                Some((stem, _)) if !stem.is_empty() => stem.to_string(),
                _ => decoded.to_string(),
            };
            humanize(&stem)
        })
        .or_else(|| {
            url.host_str()
                .map(|host| host.trim_start_matches("www.").to_string())
                .filter(|host| !host.is_empty())
        })
}

/// `how-to_cook-pasta` -> `How to cook pasta`.
fn humanize(slug: &str) -> Option<String> {
    let words = slug
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut chars = words.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// Extract the platform's content id from a URL.
///
/// YouTube 11-character video ids, TikTok numeric ids and Instagram
/// shortcodes. `None` for other platforms.
#[must_use]
pub fn extract_video_id(url: &str, platform: Platform) -> Option<String> {
    let parsed = parse_web_url(url)?;
    let segments = path_segments(&parsed);

    match platform {
        Platform::YouTube => {
            let from_query = parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned());
            let from_path = match segments.as_slice() {
                ["shorts" | "embed" | "live" | "v", id, ..] => Some((*id).to_string()),
                [id] if parsed
                    .host_str()
                    .is_some_and(|host| host_matches(&host.to_lowercase(), "youtu.be")) =>
                {
                    Some((*id).to_string())
                }
                _ => None,
            };
            from_query
                .or(from_path)
                .filter(|id| YOUTUBE_ID_RE.is_match(id))
        }
        Platform::TikTok => TIKTOK_ID_RE
            .captures(parsed.path())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
        Platform::Instagram => {
            let code = match segments.as_slice() {
                ["p" | "reel" | "reels" | "tv", code, ..] => Some((*code).to_string()),
                _ => None,
            };
            code.filter(|code| INSTAGRAM_CODE_RE.is_match(code))
        }
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_short_form_platforms() {
        assert_eq!(
            detect_platform("https://www.tiktok.com/@demo/video/123"),
            Some(Platform::TikTok)
        );
        assert_eq!(
            detect_platform("https://vm.tiktok.com/ZMabc/"),
            Some(Platform::TikTok)
        );
        assert_eq!(
            detect_platform("https://www.youtube.com/shorts/abcdefghijk"),
            Some(Platform::YouTube)
        );
        assert_eq!(
            detect_platform("https://youtu.be/abcdefghijk"),
            Some(Platform::YouTube)
        );
        assert_eq!(
            detect_platform("https://www.instagram.com/reel/Cabc123/"),
            Some(Platform::Instagram)
        );
        assert_eq!(
            detect_platform("HTTPS://WWW.TIKTOK.COM/@Demo/video/1"),
            Some(Platform::TikTok)
        );
    }

    #[test]
    fn test_detect_other_families() {
        assert_eq!(
            detect_platform("https://x.com/jack/status/20"),
            Some(Platform::Twitter)
        );
        assert_eq!(
            detect_platform("https://github.com/rust-lang/rust"),
            Some(Platform::GitHub)
        );
        assert_eq!(
            detect_platform("https://example.com/files/report.pdf"),
            Some(Platform::Document)
        );
        assert_eq!(
            detect_platform("https://example.com/blog/hello-world"),
            Some(Platform::Article)
        );
        assert_eq!(
            detect_platform("https://example.com/"),
            Some(Platform::Webpage)
        );
    }

    #[test]
    fn test_detect_does_not_match_lookalike_hosts() {
        assert_eq!(
            detect_platform("https://nottiktok.com/video"),
            Some(Platform::Webpage)
        );
        assert_eq!(
            detect_platform("https://box.com/"),
            Some(Platform::Webpage)
        );
    }

    #[test]
    fn test_detect_rejects_garbage() {
        for input in ["", "not a url", "ftp://tiktok.com/x", "javascript:alert(1)", "http://"] {
            assert_eq!(detect_platform(input), None, "{input}");
        }
    }

    #[test]
    fn test_resolve_platform_strict() {
        assert_eq!(
            resolve_platform("https://youtu.be/abcdefghijk", ValidationProfile::Strict).unwrap(),
            Platform::YouTube
        );
        assert!(matches!(
            resolve_platform("https://vimeo.com/123", ValidationProfile::Strict),
            Err(AppError::UnsupportedPlatform(p)) if p == "vimeo"
        ));
        assert!(matches!(
            resolve_platform("nonsense", ValidationProfile::Strict),
            Err(AppError::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn test_resolve_platform_permissive() {
        assert_eq!(
            resolve_platform("https://vimeo.com/123", ValidationProfile::Permissive).unwrap(),
            Platform::Vimeo
        );
        assert_eq!(
            resolve_platform("https://example.org/page", ValidationProfile::Permissive).unwrap(),
            Platform::Webpage
        );
        assert!(resolve_platform("mailto:a@b.c", ValidationProfile::Permissive).is_err());
    }

    #[test]
    fn test_platform_str_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
        assert_eq!(
            serde_json::to_string(&Platform::TikTok).unwrap(),
            "\"tiktok\""
        );
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_default_titles_for_video_platforms() {
        assert_eq!(
            extract_default_title_from_url("https://www.tiktok.com/@demo/video/123"),
            "TikTok video by @demo"
        );
        assert_eq!(
            extract_default_title_from_url("https://vm.tiktok.com/ZMabc/"),
            "TikTok video"
        );
        assert_eq!(
            extract_default_title_from_url("https://www.youtube.com/shorts/abcdefghijk"),
            "YouTube Short abcdefghijk"
        );
        assert_eq!(
            extract_default_title_from_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            "YouTube video dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_default_title_from_url("https://youtu.be/dQw4w9WgXcQ"),
            "YouTube video dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_default_title_from_url("https://www.youtube.com/@chef"),
            "YouTube video by @chef"
        );
        assert_eq!(
            extract_default_title_from_url("https://www.instagram.com/reel/Cabc123/"),
            "Instagram Reel Cabc123"
        );
        assert_eq!(
            extract_default_title_from_url("https://www.instagram.com/p/Cxyz/"),
            "Instagram post Cxyz"
        );
        assert_eq!(
            extract_default_title_from_url("https://www.instagram.com/natgeo/"),
            "Instagram post by @natgeo"
        );
    }

    #[test]
    fn test_default_titles_for_other_platforms() {
        assert_eq!(
            extract_default_title_from_url("https://x.com/jack/status/20"),
            "Post by @jack on X"
        );
        assert_eq!(
            extract_default_title_from_url(
                "https://www.reddit.com/r/cooking/comments/abc123/best_weeknight-pasta/"
            ),
            "Best weeknight pasta"
        );
        assert_eq!(
            extract_default_title_from_url("https://www.reddit.com/r/cooking/"),
            "Reddit post in r/cooking"
        );
        assert_eq!(
            extract_default_title_from_url("https://github.com/rust-lang/rust"),
            "rust-lang/rust on GitHub"
        );
        assert_eq!(
            extract_default_title_from_url("https://example.com/blog/how-to_cook-pasta.html"),
            "How to cook pasta"
        );
        assert_eq!(
            extract_default_title_from_url("https://www.example.com/"),
            "example.com"
        );
    }

    #[test]
    fn test_default_title_never_empty() {
        for input in [
            "",
            "   ",
            "::::",
            "https://",
            "https://www.tiktok.com",
            "https://example.com/---/",
            "https://example.com/%E2%9C%A8",
            "http://[::1]/",
        ] {
            let title = extract_default_title_from_url(input);
            assert!(!title.trim().is_empty(), "empty title for {input:?}");
        }
        assert_eq!(extract_default_title_from_url("not a url"), UNTITLED);
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=1", Platform::YouTube),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/abcdefghijk", Platform::YouTube),
            Some("abcdefghijk".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/short", Platform::YouTube),
            None
        );
        assert_eq!(
            extract_video_id("https://www.tiktok.com/@demo/video/7200000000", Platform::TikTok),
            Some("7200000000".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.instagram.com/reel/Cabc123/", Platform::Instagram),
            Some("Cabc123".to_string())
        );
        assert_eq!(
            extract_video_id("https://vimeo.com/123", Platform::Vimeo),
            None
        );
    }
}
