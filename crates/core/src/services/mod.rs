//! Business logic services.

#![allow(missing_docs)]

pub mod analytics;
pub mod classifier;
pub mod custom_tab;
pub mod ingestion;
pub mod link;
pub mod metadata;
pub mod platform;
pub mod quota;
pub mod tag;
pub mod user;

#[cfg(test)]
mod testing;

pub use analytics::{AnalyticsService, CategoryCount, LibrarySummary, PlatformCount};
pub use classifier::{
    Classification, ClassifierService, CompletionProvider, OpenAiCompletionProvider,
};
pub use custom_tab::{CreateTabInput, CustomTabService, UpdateTabInput};
pub use ingestion::{IngestLinkInput, IngestionService};
pub use link::{LinkService, LinkWithTags, ListKind, ListLinksQuery};
pub use metadata::{HttpOEmbedFetcher, Metadata, MetadataExtractor, OEmbedFetcher};
pub use platform::{Platform, detect_platform, extract_default_title_from_url, resolve_platform};
pub use quota::{QuotaService, QuotaStatus};
pub use tag::{TagCount, TagService};
pub use user::{CreateUserInput, UpdateProfileInput, UserService};
