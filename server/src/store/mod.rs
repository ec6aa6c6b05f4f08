//! Data-access seam between handlers and persistence.
//!
//! # Design
//! Handlers hold an `Arc<dyn Store>` injected through `AppState`; there is no
//! process-wide handle. `PgStore` talks to PostgreSQL through a bounded
//! `sqlx` pool, `MemoryStore` keeps everything in a map and backs the tests
//! and the `--store memory` mode. Both report failures as `StoreError`.

mod memory;
mod postgres;

use async_trait::async_trait;

pub use memory::MemoryStore;
pub use postgres::{PgStore, PoolSettings};

use crate::error::StoreError;
use crate::models::{NewPost, NewUser, PatchUserRequest, Post, User};

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_user(&self, id: i64) -> Result<User, StoreError>;

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Replace every mutable field of user `id` and bump `updated_at`.
    async fn update_user(&self, id: i64, user: NewUser) -> Result<User, StoreError>;

    async fn delete_user(&self, id: i64) -> Result<(), StoreError>;

    async fn get_post(&self, id: i64) -> Result<Post, StoreError>;

    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError>;

    async fn update_post(&self, id: i64, post: NewPost) -> Result<Post, StoreError>;

    async fn delete_post(&self, id: i64) -> Result<(), StoreError>;

    /// Read-modify-write partial update. Not atomic: two concurrent patches
    /// of the same user may interleave and the last write wins.
    async fn patch_user(&self, id: i64, patch: PatchUserRequest) -> Result<User, StoreError> {
        let current = self.get_user(id).await?;
        let merged = NewUser {
            name: patch.name.unwrap_or(current.name),
            email: patch.email.unwrap_or(current.email),
            username: current.username,
        };
        self.update_user(id, merged).await
    }
}
