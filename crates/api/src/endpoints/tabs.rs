//! Custom tab endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use reelshelf_common::AppResult;
use reelshelf_core::{CreateTabInput, UpdateTabInput};
use reelshelf_db::entities::custom_tab;
use serde::{Deserialize, Serialize};

use super::links::LinkResponse;
use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Created, no_content},
};

/// Custom tab response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<custom_tab::Model> for TabResponse {
    fn from(t: custom_tab::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            description: t.description,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Pagination query.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<TabResponse>>> {
    let tabs = state.custom_tab_service.list(user.id).await?;
    Ok(ApiResponse::ok(
        tabs.into_iter().map(TabResponse::from).collect(),
    ))
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTabInput>,
) -> AppResult<Created<TabResponse>> {
    let tab = state.custom_tab_service.create(user.id, input).await?;
    Ok(Created(tab.into()))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateTabInput>,
) -> AppResult<ApiResponse<TabResponse>> {
    let tab = state.custom_tab_service.update(user.id, id, input).await?;
    Ok(ApiResponse::ok(tab.into()))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.custom_tab_service.delete(user.id, id).await?;
    Ok(no_content())
}

async fn list_links(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<LinkResponse>>> {
    let links = state
        .custom_tab_service
        .list_links(user.id, id, page.limit, page.offset)
        .await?;
    Ok(ApiResponse::ok(
        links.into_iter().map(LinkResponse::from).collect(),
    ))
}

async fn add_link(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((id, link_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    state
        .custom_tab_service
        .add_link(user.id, id, link_id)
        .await?;
    Ok(no_content())
}

async fn remove_link(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((id, link_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    state
        .custom_tab_service
        .remove_link(user.id, id, link_id)
        .await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tabs", get(list).post(create))
        .route("/tabs/{id}", patch(update).delete(delete))
        .route("/tabs/{id}/links", get(list_links))
        .route("/tabs/{id}/links/{link_id}", post(add_link).delete(remove_link))
}
