//! Tag endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};
use reelshelf_common::AppResult;
use reelshelf_core::TagCount;
use serde::Deserialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Popular tags query.
#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_limit() -> u64 {
    10
}

/// Remove a tag.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.tag_service.delete(user.id, id).await?;
    Ok(no_content())
}

/// Most used tags across the user's library.
async fn popular(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> AppResult<ApiResponse<Vec<TagCount>>> {
    let tags = state
        .tag_service
        .popular_for_user(user.id, query.limit)
        .await?;
    Ok(ApiResponse::ok(tags))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tags/popular", get(popular))
        .route("/tags/{id}", delete(remove))
}
