//! Wire shapes for the users and posts API.
//!
//! # Design
//! Entities (`User`, `Post`) are what the store returns and what handlers
//! echo back. Request DTOs are decoded from JSON bodies and validated by the
//! handlers before any store access. The client crate defines its own copy of
//! these shapes; integration tests catch schema drift between the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A persisted user. `id` and both timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted post. `user_id` travels as `userId` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
}

/// Body of `PUT /users/{id}`. Every field is replaced.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
}

/// Body of `PATCH /users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Body of `POST /posts` and `PUT /posts/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    #[serde(rename = "userId", default, deserialize_with = "null_as_default")]
    pub user_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
}

/// Treats an explicit `null` like a missing field, so it reaches validation.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Validated user fields handed to the store for create and full update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub username: String,
}

/// Validated post fields handed to the store for create and full update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

impl CreateUserRequest {
    pub fn validate(self) -> Option<NewUser> {
        user_fields(self.name, self.email, self.username)
    }
}

impl UpdateUserRequest {
    pub fn validate(self) -> Option<NewUser> {
        user_fields(self.name, self.email, self.username)
    }
}

impl CreatePostRequest {
    pub fn validate(self) -> Option<NewPost> {
        if self.title.is_empty() || self.body.is_empty() {
            return None;
        }
        Some(NewPost {
            user_id: self.user_id,
            title: self.title,
            body: self.body,
        })
    }
}

fn user_fields(name: String, email: String, username: String) -> Option<NewUser> {
    if name.is_empty() || email.is_empty() || username.is_empty() {
        return None;
    }
    Some(NewUser {
        name,
        email,
        username,
    })
}

/// Generic acknowledgement, used by the delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Payload of a delete acknowledgement: the id that was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedId {
    pub id: i64,
}

/// Every failure body has exactly this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    #[serde(rename = "bearerToken")]
    pub bearer_token: String,
}
