//! API endpoints.

mod analytics;
mod auth;
mod links;
mod me;
mod tabs;
mod tags;

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::middleware::AppState;

pub use links::{LinkResponse, TagResponse};

/// Largest accepted request body. Every endpoint takes small JSON.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(me::router())
        .merge(links::router())
        .merge(tags::router())
        .merge(tabs::router())
        .merge(analytics::router())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}
