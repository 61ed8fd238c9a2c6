//! Analytics endpoint.

use axum::{Router, extract::State, routing::get};
use reelshelf_common::AppResult;
use reelshelf_core::LibrarySummary;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Summary of the user's library.
async fn summary(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<LibrarySummary>> {
    let summary = state.analytics_service.summary(user.id).await?;
    Ok(ApiResponse::ok(summary))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/analytics", get(summary))
}
