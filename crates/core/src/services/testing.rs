//! Stub I/O backends shared by service tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reelshelf_common::{AppError, AppResult};

use super::classifier::CompletionProvider;
use super::metadata::{OEmbedFetcher, OEmbedResponse};

/// Returns a canned oEmbed response (or error) and records every endpoint.
pub struct MockFetcher {
    response: Option<OEmbedResponse>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn ok(title: Option<&str>, thumbnail: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            response: Some(OEmbedResponse {
                title: title.map(str::to_string),
                thumbnail_url: thumbnail.map(str::to_string),
                author_name: None,
            }),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OEmbedFetcher for MockFetcher {
    async fn fetch(&self, endpoint: &str) -> AppResult<OEmbedResponse> {
        self.calls.lock().unwrap().push(endpoint.to_string());
        self.response
            .clone()
            .ok_or_else(|| AppError::ExternalService("connection refused".to_string()))
    }
}

/// Returns canned completion content (or error) and records every prompt.
pub struct MockProvider {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn replying(content: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(content.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, _system: &str, user: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(user.to_string());
        self.reply
            .clone()
            .ok_or_else(|| AppError::ExternalService("429 Too Many Requests".to_string()))
    }
}
