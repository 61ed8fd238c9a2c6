//! HTTP API layer for reelshelf.
//!
//! - **Endpoints**: auth, profile, link ingestion and library, tags, custom
//!   tabs, analytics
//! - **Extractors**: authenticated user
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
