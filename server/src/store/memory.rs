use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::Store;
use crate::error::StoreError;
use crate::models::{NewPost, NewUser, Post, User};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<i64, User>,
    posts: HashMap<i64, Post>,
    last_user_id: i64,
    last_post_id: i64,
}

impl Tables {
    /// True if another user already holds `email` or `username`.
    fn collides(&self, candidate: &NewUser, except: Option<i64>) -> bool {
        self.users.values().any(|u| {
            Some(u.id) != except && (u.email == candidate.email || u.username == candidate.username)
        })
    }
}

/// In-process store with the same observable behavior as `PgStore`:
/// ids start at 1 and never repeat, email and username are unique.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, id: i64) -> Result<User, StoreError> {
        let tables = self.tables.read().await;
        tables.users.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.collides(&user, None) {
            return Err(StoreError::Conflict);
        }
        tables.last_user_id += 1;
        let now = Utc::now();
        let created = User {
            id: tables.last_user_id,
            name: user.name,
            email: user.email,
            username: user.username,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: i64, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if tables.collides(&user, Some(id)) {
            return Err(StoreError::Conflict);
        }
        let existing = tables.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        existing.name = user.name;
        existing.email = user.email;
        existing.username = user.username;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete_user(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn get_post(&self, id: i64) -> Result<Post, StoreError> {
        let tables = self.tables.read().await;
        tables.posts.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut tables = self.tables.write().await;
        tables.last_post_id += 1;
        let now = Utc::now();
        let created = Post {
            id: tables.last_post_id,
            user_id: post.user_id,
            title: post.title,
            body: post.body,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_post(&self, id: i64, post: NewPost) -> Result<Post, StoreError> {
        let mut tables = self.tables.write().await;
        let existing = tables.posts.get_mut(&id).ok_or(StoreError::NotFound)?;
        existing.user_id = post.user_id;
        existing.title = post.title;
        existing.body = post.body;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete_post(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
