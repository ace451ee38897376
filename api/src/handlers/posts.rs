use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use common::models::{NewPost, Post};
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::{parse_id, require_fields, ApiResponse};
use crate::state::AppState;

/// Body of `POST /posts`
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(rename = "userId", default)]
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Body of `PUT /posts/:id`; both fields are required
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

const POST_NOT_FOUND: &str = "Post not found";

/// List all posts, newest first
#[tracing::instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> Result<ApiResponse<Vec<Post>>, ApiError> {
    let posts = state
        .posts
        .find_all()
        .await
        .map_err(|e| state.internal_error("Failed to load the post list", &e))?;

    let message = format!("Loaded {} posts", posts.len());
    Ok(ApiResponse::ok(posts, message))
}

/// Get a single post
#[tracing::instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    WithRejection(Path(raw_id), _): WithRejection<Path<String>, ApiError>,
) -> Result<ApiResponse<Post>, ApiError> {
    let post_id = parse_id(&raw_id, POST_NOT_FOUND)?;
    let post = state
        .posts
        .find_by_id(post_id)
        .await
        .map_err(|e| state.internal_error("Failed to load the post", &e))?
        .ok_or_else(|| ApiError::NotFound(POST_NOT_FOUND.to_string()))?;

    Ok(ApiResponse::ok(post, "Post loaded"))
}

/// Create a post
#[tracing::instrument(skip(state, req))]
pub async fn create_post(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreatePostRequest>, ApiError>,
) -> Result<ApiResponse<Post>, ApiError> {
    require_fields(&[("title", req.title.as_deref()), ("body", req.body.as_deref())])?;

    let new_post = NewPost {
        user_id: req.user_id,
        title: req.title.unwrap_or_default(),
        body: req.body.unwrap_or_default(),
    };

    let post = state
        .posts
        .create(&new_post)
        .await
        .map_err(|e| state.internal_error("Failed to create the post", &e))?;

    tracing::info!(post_id = post.id, "Post created successfully");
    Ok(ApiResponse::created(post, "Post created successfully"))
}

/// Replace a post's title and body
///
/// Validation happens before any database access, so a rejected request
/// never changes the stored row. A body check failure wins over a bad id.
#[tracing::instrument(skip(state, req))]
pub async fn update_post(
    State(state): State<AppState>,
    WithRejection(Path(raw_id), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<UpdatePostRequest>, ApiError>,
) -> Result<ApiResponse<Post>, ApiError> {
    require_fields(&[("title", req.title.as_deref()), ("body", req.body.as_deref())])?;
    let title = req.title.unwrap_or_default();
    let body = req.body.unwrap_or_default();
    let post_id = parse_id(&raw_id, POST_NOT_FOUND)?;

    match state.posts.update(post_id, &title, &body).await {
        Ok(post) => {
            tracing::info!(post_id, "Post updated successfully");
            Ok(ApiResponse::ok(post, "Post updated successfully"))
        }
        Err(e) if e.is_not_found() => Err(ApiError::NotFound(POST_NOT_FOUND.to_string())),
        Err(e) => Err(state.internal_error("Failed to update the post", &e)),
    }
}

/// Delete a post
#[tracing::instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    WithRejection(Path(raw_id), _): WithRejection<Path<String>, ApiError>,
) -> Result<ApiResponse<()>, ApiError> {
    let post_id = parse_id(&raw_id, POST_NOT_FOUND)?;
    match state.posts.delete(post_id).await {
        Ok(()) => {
            tracing::info!(post_id, "Post deleted successfully");
            Ok(ApiResponse::message("Post deleted successfully"))
        }
        Err(e) if e.is_not_found() => Err(ApiError::NotFound(POST_NOT_FOUND.to_string())),
        Err(e) => Err(state.internal_error("Failed to delete the post", &e)),
    }
}
