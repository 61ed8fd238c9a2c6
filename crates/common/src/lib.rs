//! Common utilities and shared types for reelshelf.
//!
//! This crate provides foundational components used across all reelshelf crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **HTTP**: Outbound client construction via [`HttpClientConfig`]
//!
//! # Example
//!
//! ```no_run
//! use reelshelf_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("Free tier limit: {}", config.ingestion.free_tier_limit);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;

pub use config::{Config, ValidationProfile};
pub use error::{AppError, AppResult};
pub use http::HttpClientConfig;
