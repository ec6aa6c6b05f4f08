use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::{json_body, resource_id};
use crate::error::{ApiError, Resource};
use crate::models::{CreatePostRequest, DeletedId, Post, SuccessResponse};
use crate::AppState;

const REQUIRED: ApiError = ApiError::Validation("Title and body are required");

pub async fn get_post(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Post>, ApiError> {
    let id = resource_id(id, Resource::Post)?;
    let post = state
        .store
        .get_post(id)
        .await
        .map_err(|e| ApiError::from_store(e, "get", Resource::Post))?;
    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let input = json_body::<CreatePostRequest>(body)?.validate().ok_or(REQUIRED)?;
    let post = state
        .store
        .create_post(input)
        .await
        .map_err(|e| ApiError::from_store(e, "create", Resource::Post))?;
    tracing::info!(id = post.id, user_id = post.user_id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// Full replace; the body has the same shape as a create.
pub async fn update_post(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Post>, ApiError> {
    let id = resource_id(id, Resource::Post)?;
    let input = json_body::<CreatePostRequest>(body)?.validate().ok_or(REQUIRED)?;
    let post = state
        .store
        .update_post(id, input)
        .await
        .map_err(|e| ApiError::from_store(e, "update", Resource::Post))?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessResponse<DeletedId>>, ApiError> {
    let id = resource_id(id, Resource::Post)?;
    state
        .store
        .delete_post(id)
        .await
        .map_err(|e| ApiError::from_store(e, "delete", Resource::Post))?;
    tracing::info!(id, "post deleted");
    Ok(Json(SuccessResponse {
        message: "Post deleted successfully".to_string(),
        data: Some(DeletedId { id }),
    }))
}
