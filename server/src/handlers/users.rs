use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::{json_body, resource_id};
use crate::error::{ApiError, Resource};
use crate::models::{
    CreateUserRequest, DeletedId, PatchUserRequest, SuccessResponse, UpdateUserRequest, User,
};
use crate::AppState;

const REQUIRED: ApiError = ApiError::Validation("Name, email, and username are required");

pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let id = resource_id(id, Resource::User)?;
    let user = state
        .store
        .get_user(id)
        .await
        .map_err(|e| ApiError::from_store(e, "get", Resource::User))?;
    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let input = json_body::<CreateUserRequest>(body)?.validate().ok_or(REQUIRED)?;
    let user = state
        .store
        .create_user(input)
        .await
        .map_err(|e| ApiError::from_store(e, "create", Resource::User))?;
    tracing::info!(id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<User>, ApiError> {
    let id = resource_id(id, Resource::User)?;
    let input = json_body::<UpdateUserRequest>(body)?.validate().ok_or(REQUIRED)?;
    let user = state
        .store
        .update_user(id, input)
        .await
        .map_err(|e| ApiError::from_store(e, "update", Resource::User))?;
    Ok(Json(user))
}

pub async fn patch_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<User>, ApiError> {
    let id = resource_id(id, Resource::User)?;
    let patch = json_body::<PatchUserRequest>(body)?;
    let user = state
        .store
        .patch_user(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "update", Resource::User))?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessResponse<DeletedId>>, ApiError> {
    let id = resource_id(id, Resource::User)?;
    state
        .store
        .delete_user(id)
        .await
        .map_err(|e| ApiError::from_store(e, "delete", Resource::User))?;
    tracing::info!(id, "user deleted");
    Ok(Json(SuccessResponse {
        message: "User deleted successfully".to_string(),
        data: Some(DeletedId { id }),
    }))
}
