//! Content classifier backed by an LLM chat-completion API.
//!
//! Classification never fails. Provider errors and malformed output degrade
//! to `Uncategorized` with no tags.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use reelshelf_common::{AppError, AppResult, HttpClientConfig, config::AiConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::platform::{Platform, extract_default_title_from_url};

/// Category used when none could be determined.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Maximum number of tags kept per link.
pub const MAX_TAGS: usize = 10;

/// Maximum category length in characters.
pub const MAX_CATEGORY_LEN: usize = 64;

/// Maximum tag name length in characters.
pub const MAX_TAG_LEN: usize = 50;

const MAX_PROMPT_TITLE_LEN: usize = 120;

const SUGGESTED_CATEGORIES: [&str; 16] = [
    "Cooking",
    "Fitness",
    "Comedy",
    "Music",
    "Dance",
    "Education",
    "Technology",
    "Travel",
    "Fashion",
    "Beauty",
    "Gaming",
    "Sports",
    "News",
    "Finance",
    "DIY",
    "Pets",
];

const STOPWORDS: [&str; 32] = [
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "i",
    "in", "is", "it", "its", "my", "of", "on", "or", "our", "so", "that", "the", "this", "to",
    "was", "we", "with", "you",
];

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*(.*?)\s*```$").expect("valid regex")
});

/// Classifier output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    pub duration: Option<i32>,
}

impl Classification {
    /// The full default: given title, `Uncategorized`, no tags.
    #[must_use]
    pub fn fallback(title: &str) -> Self {
        Self {
            title: title.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            tags: Vec::new(),
            duration: None,
        }
    }

    /// Read a classification from JSON, validating each field on its own.
    ///
    /// Used both for fresh model output and for metadata cached on a
    /// previously saved link.
    #[must_use]
    pub fn from_value(value: &Value, fallback_title: &str) -> Self {
        let Some(object) = value.as_object() else {
            return Self::fallback(fallback_title);
        };

        let title = object
            .get("title")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback_title)
            .to_string();

        let category = object
            .get("category")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.chars().count() <= MAX_CATEGORY_LEN)
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string();

        let tags = object
            .get("tags")
            .and_then(Value::as_array)
            .map(|items| normalize_tags(items.iter().filter_map(Value::as_str)))
            .unwrap_or_default();

        let duration = object.get("duration").and_then(parse_duration);

        Self {
            title,
            category,
            tags,
            duration,
        }
    }

    /// JSON stored in the link's `metadata` column.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "title": self.title,
            "category": self.category,
            "tags": self.tags,
            "duration": self.duration,
        })
    }
}

/// Normalize a tag name: trim, strip leading `#`, lowercase.
#[must_use]
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim().trim_start_matches('#').trim().to_lowercase();
    (!tag.is_empty()).then_some(tag)
}

/// Normalize, de-duplicate (first occurrence wins) and cap a tag list.
///
/// Tags longer than [`MAX_TAG_LEN`] are dropped.
pub fn normalize_tags<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let fitting = raw
        .into_iter()
        .filter_map(normalize_tag)
        .filter(|tag| tag.chars().count() <= MAX_TAG_LEN);
    for tag in fitting {
        if tags.len() == MAX_TAGS {
            break;
        }
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

fn parse_duration(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|secs| i32::try_from(secs).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok().and_then(|secs| i32::try_from(secs).ok()),
        _ => None,
    }
}

/// Parse raw model output into a classification.
///
/// A fenced code block is unwrapped once; anything that still is not a JSON
/// object yields the full default.
#[must_use]
pub fn parse_classification(content: &str, fallback_title: &str) -> Classification {
    let trimmed = content.trim();
    let body = CODE_FENCE_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str());

    match serde_json::from_str::<Value>(body) {
        Ok(value) => Classification::from_value(&value, fallback_title),
        Err(e) => {
            warn!(error = %e, "Classifier returned non-JSON output");
            Classification::fallback(fallback_title)
        }
    }
}

fn is_pictograph(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0x2B00..=0x2BFF | 0xFE00..=0xFE0F | 0x200D
    )
}

/// Shrink a title for the prompt.
///
/// Strips pictographs, collapses whitespace, drops common English stopwords
/// and truncates. If only stopwords remain they are kept.
#[must_use]
pub fn normalize_title_for_prompt(title: &str) -> String {
    let cleaned: String = title.chars().filter(|c| !is_pictograph(*c)).collect();
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    let kept: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| !STOPWORDS.contains(&w.to_lowercase().as_str()))
        .collect();
    let kept = if kept.is_empty() { words } else { kept };

    let joined = kept.join(" ");
    if joined.chars().count() <= MAX_PROMPT_TITLE_LEN {
        return joined;
    }
    joined
        .chars()
        .take(MAX_PROMPT_TITLE_LEN)
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn system_prompt() -> String {
    format!(
        "Classify a saved short video. Reply with one JSON object only: \
         {{\"title\": string, \"category\": string, \"tags\": string[], \"duration\": number|null}}. \
         category: one short label, prefer one of {}. \
         tags: up to {MAX_TAGS} lowercase keywords, no '#'. \
         duration: seconds if known, else null.",
        SUGGESTED_CATEGORIES.join(", ")
    )
}

fn user_prompt(
    url: &str,
    platform: Platform,
    title: &str,
    title_resolved: bool,
    author: Option<&str>,
) -> String {
    let mut prompt = format!("platform: {platform}\nurl: {url}\n");
    if title_resolved {
        prompt.push_str(&format!("title (echo exactly): {title}\n"));
    } else {
        prompt.push_str(&format!(
            "title hint (write a short title): {}\n",
            normalize_title_for_prompt(title)
        ));
    }
    if let Some(author) = author.map(str::trim).filter(|a| !a.is_empty()) {
        prompt.push_str(&format!("author: {author}\n"));
    }
    prompt
}

/// A chat-completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion and return the assistant message content.
    async fn complete(&self, system: &str, user: &str) -> AppResult<String>;
}

/// OpenAI-compatible chat completions.
#[derive(Clone)]
pub struct OpenAiCompletionProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletionProvider {
    /// Create a provider. Returns `None` when no API key is configured.
    pub fn from_config(config: &AiConfig) -> AppResult<Option<Self>> {
        let Some(api_key) = config.api_key.clone().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };

        let client = HttpClientConfig {
            timeout_secs: config.timeout_secs,
            ..HttpClientConfig::default()
        }
        .build()?;

        Ok(Some(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        }))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionProvider {
    async fn complete(&self, system: &str, user: &str) -> AppResult<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "temperature": 0.2,
            "response_format": {"type": "json_object"},
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Completion request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Completion API error: {status} - {body}"
            )));
        }

        #[derive(Deserialize)]
        struct CompletionResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }

        #[derive(Deserialize)]
        struct Message {
            content: Option<String>,
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse completion response: {e}"))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::ExternalService("Empty completion".to_string()))
    }
}

/// Classifies links into title, category, tags and duration.
#[derive(Clone)]
pub struct ClassifierService {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl ClassifierService {
    /// Create a classifier. Without a provider every call returns defaults.
    #[must_use]
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self { provider }
    }

    /// Whether a completion backend is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Classify a link. Never fails.
    ///
    /// `title` is the best title known so far; when it differs from the URL
    /// heuristic the model is asked to keep it.
    pub async fn classify(
        &self,
        url: &str,
        platform: Platform,
        title: &str,
        author: Option<&str>,
    ) -> Classification {
        let Some(provider) = &self.provider else {
            debug!("Classifier disabled, using defaults");
            return Classification::fallback(title);
        };

        let title_resolved = title != extract_default_title_from_url(url);
        let user = user_prompt(url, platform, title, title_resolved, author);

        match provider.complete(&system_prompt(), &user).await {
            Ok(content) => {
                let classification = parse_classification(&content, title);
                debug!(
                    category = %classification.category,
                    tags = classification.tags.len(),
                    "Link classified"
                );
                classification
            }
            Err(e) => {
                warn!(error = %e, %platform, "Classification failed, using defaults");
                Classification::fallback(title)
            }
        }
    }
}
