//! Core business logic for reelshelf.
//!
//! The ingestion pipeline lives in [`services::ingestion`]: a pasted URL is
//! resolved to a [`Platform`], checked against the free-tier quota and the
//! user's existing links, enriched with oEmbed metadata and an LLM
//! classification (or a cached one), then persisted with its tags.

pub mod services;

pub use services::*;
