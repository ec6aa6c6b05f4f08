//! Request handlers, one module per resource.
//!
//! Handlers receive extractor results rather than bare extractors so that
//! body and path rejections are answered with the API's own JSON errors.

pub mod health;
pub mod posts;
pub mod users;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::Path;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Resource};

pub(crate) fn resource_id(
    path: Result<Path<i64>, PathRejection>,
    resource: Resource,
) -> Result<i64, ApiError> {
    path.map(|Path(id)| id).map_err(|_| ApiError::InvalidId(resource))
}

/// Decode a JSON body whatever `Content-Type` the caller sent.
pub(crate) fn json_body<T: DeserializeOwned>(
    body: Result<Bytes, BytesRejection>,
) -> Result<T, ApiError> {
    let bytes = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable request body");
        ApiError::InvalidBody
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        tracing::debug!(error = %err, "rejected request body");
        ApiError::InvalidBody
    })
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
