//! Link endpoints: ingestion and the saved library.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use reelshelf_common::AppResult;
use reelshelf_core::{IngestLinkInput, LinkWithTags, ListLinksQuery};
use reelshelf_db::entities::{link, tag};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Created, no_content},
};

// ==================== Request/Response Types ====================

/// Tag response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub link_id: i32,
    pub created_at: String,
}

impl From<tag::Model> for TagResponse {
    fn from(t: tag::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            link_id: t.link_id,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Link response. `tags` is present when the endpoint loads them.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i32,
    pub url: String,
    pub title: String,
    pub platform: String,
    pub thumbnail_url: Option<String>,
    pub category: String,
    pub duration: Option<i32>,
    pub user_id: i32,
    pub created_at: String,
    pub last_viewed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagResponse>>,
}

impl From<link::Model> for LinkResponse {
    fn from(l: link::Model) -> Self {
        Self {
            id: l.id,
            url: l.url,
            title: l.title,
            platform: l.platform,
            thumbnail_url: l.thumbnail_url,
            category: l.category,
            duration: l.duration,
            user_id: l.user_id,
            created_at: l.created_at.to_rfc3339(),
            last_viewed: l.last_viewed.to_rfc3339(),
            tags: None,
        }
    }
}

impl From<LinkWithTags> for LinkResponse {
    fn from(lt: LinkWithTags) -> Self {
        Self {
            tags: Some(lt.tags.into_iter().map(TagResponse::from).collect()),
            ..Self::from(lt.link)
        }
    }
}

/// Update category request.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub category: String,
}

/// Add tag request.
#[derive(Debug, Deserialize)]
pub struct AddTagRequest {
    pub name: String,
}

// ==================== Handlers ====================

/// Save a pasted link.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<IngestLinkInput>,
) -> AppResult<Created<LinkResponse>> {
    let saved = state.ingestion_service.ingest(user.id, input).await?;
    Ok(Created(saved.into()))
}

/// List saved links.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListLinksQuery>,
) -> AppResult<ApiResponse<Vec<LinkResponse>>> {
    let links = state.link_service.list(user.id, &query).await?;
    Ok(ApiResponse::ok(
        links.into_iter().map(LinkResponse::from).collect(),
    ))
}

/// Show a saved link with its tags.
async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<LinkResponse>> {
    let link = state.link_service.get(user.id, id).await?;
    Ok(ApiResponse::ok(link.into()))
}

/// Delete a saved link.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.link_service.delete(user.id, id).await?;
    Ok(no_content())
}

/// Record that the link was opened.
async fn view(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<LinkResponse>> {
    let link = state.link_service.record_view(user.id, id).await?;
    Ok(ApiResponse::ok(link.into()))
}

/// Change a link's category.
async fn update_category(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateCategoryRequest>,
) -> AppResult<ApiResponse<LinkResponse>> {
    let link = state
        .link_service
        .update_category(user.id, id, &req.category)
        .await?;
    Ok(ApiResponse::ok(link.into()))
}

/// Tags of a link.
async fn list_tags(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<Vec<TagResponse>>> {
    let tags = state.tag_service.list_for_link(user.id, id).await?;
    Ok(ApiResponse::ok(
        tags.into_iter().map(TagResponse::from).collect(),
    ))
}

/// Add a tag to a link.
async fn add_tag(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<AddTagRequest>,
) -> AppResult<Created<TagResponse>> {
    let tag = state.tag_service.add_to_link(user.id, id, &req.name).await?;
    Ok(Created(tag.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/links", post(create).get(list))
        .route("/links/{id}", get(show).delete(delete))
        .route("/links/{id}/view", post(view))
        .route("/links/{id}/category", patch(update_category))
        .route("/links/{id}/tags", get(list_tags).post(add_tag))
}
