//! Error taxonomy for the server.
//!
//! # Design
//! The data-access layer returns `StoreError`, a small set of tagged
//! variants, so handlers never inspect error text. Handlers translate those
//! into `ApiError`, which owns the mapping to a status code and the
//! `{"error": "..."}` body. Underlying store causes are logged, not returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::ErrorResponse;

/// Failures reported by a `Store` implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row matched the requested id.
    #[error("record not found")]
    NotFound,

    /// A uniqueness constraint (email or username) rejected the write.
    #[error("unique constraint violated")]
    Conflict,

    /// Anything else the backend reported.
    #[error("store backend failure: {0}")]
    Backend(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Conflict,
            other => StoreError::Backend(other),
        }
    }
}

/// The resource a handler operates on. Used to phrase error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Post,
}

impl Resource {
    fn title(self) -> &'static str {
        match self {
            Resource::User => "User",
            Resource::Post => "Post",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Resource::User => "user",
            Resource::Post => "post",
        }
    }
}

/// Every way a request can fail, as seen by an HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request body")]
    InvalidBody,

    #[error("{0}")]
    Validation(&'static str),

    #[error("Invalid {} ID", .0.noun())]
    InvalidId(Resource),

    #[error("{} not found", .0.title())]
    NotFound(Resource),

    #[error("User with this email or username already exists")]
    Conflict,

    /// A store failure the client only sees as a generic message.
    #[error("Failed to {verb} {}", .resource.noun())]
    Store {
        verb: &'static str,
        resource: Resource,
    },

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    RouteNotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody | ApiError::Validation(_) | ApiError::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Translate a store failure for `verb` on `resource`.
    ///
    /// Conflicts only surface as 409 for users; a post has no unique columns,
    /// so a conflict there is reported like any other backend failure.
    pub fn from_store(err: StoreError, verb: &'static str, resource: Resource) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound(resource),
            StoreError::Conflict if resource == Resource::User => ApiError::Conflict,
            StoreError::Conflict => ApiError::Store { verb, resource },
            StoreError::Backend(cause) => {
                tracing::error!(
                    error = %cause,
                    op = verb,
                    resource = resource.noun(),
                    "store operation failed"
                );
                ApiError::Store { verb, resource }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
