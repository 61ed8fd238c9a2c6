//! Current user endpoints.

use axum::{Json, Router, extract::State, routing::get};
use reelshelf_common::AppResult;
use reelshelf_core::{QuotaStatus, UpdateProfileInput};
use reelshelf_db::entities::user;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Profile of the signed-in user.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_premium: bool,
    pub created_at: String,
}

impl From<user::Model> for ProfileResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            display_name: u.display_name,
            bio: u.bio,
            avatar_url: u.avatar_url,
            is_premium: u.is_premium,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

async fn show(AuthUser(user): AuthUser) -> ApiResponse<ProfileResponse> {
    ApiResponse::ok(user.into())
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let updated = state.user_service.update_profile(user.id, input).await?;
    Ok(ApiResponse::ok(updated.into()))
}

async fn quota(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<QuotaStatus>> {
    let status = state.quota_service.status_for(&user).await?;
    Ok(ApiResponse::ok(status))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(show).patch(update))
        .route("/me/quota", get(quota))
}
