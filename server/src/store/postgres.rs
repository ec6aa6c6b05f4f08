//! PostgreSQL-backed store.
//!
//! Every operation is a single parameterized statement; rows come back
//! through `RETURNING` and are mapped with `sqlx::FromRow`. The expected
//! schema lives in `schema.sql` at the crate root and is not applied here.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use super::Store;
use crate::error::StoreError;
use crate::models::{NewPost, NewUser, Post, User};

/// Bounds for the shared connection pool and the startup retry loop.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    pub connect_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 25,
            min_connections: 5,
            max_lifetime: Duration::from_secs(300),
            connect_attempts: 5,
            retry_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open the pool and check it with a round-trip, retrying on failure.
    pub async fn connect(options: PgConnectOptions, settings: &PoolSettings) -> Result<Self, sqlx::Error> {
        let attempts = settings.connect_attempts.max(1);
        let mut attempt = 1;
        loop {
            let result = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .min_connections(settings.min_connections)
                .max_lifetime(settings.max_lifetime)
                .connect_with(options.clone())
                .await;
            match result {
                Ok(pool) => {
                    tracing::info!("database connected");
                    return Ok(Self::new(pool));
                }
                Err(err) if attempt < attempts => {
                    tracing::warn!(attempt, attempts, error = %err, "database connection attempt failed");
                    tokio::time::sleep(settings.retry_delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_user(&self, id: i64) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, username, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, username) VALUES ($1, $2, $3)
            RETURNING id, name, email, username, created_at, updated_at
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.username)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_user(&self, id: i64, user: NewUser) -> Result<User, StoreError> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET name = $1, email = $2, username = $3, updated_at = CURRENT_TIMESTAMP
            WHERE id = $4
            RETURNING id, name, email, username, created_at, updated_at
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.username)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_user(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn get_post(&self, id: i64) -> Result<Post, StoreError> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, user_id, title, body, created_at, updated_at FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let created = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, title, body) VALUES ($1, $2, $3)
            RETURNING id, user_id, title, body, created_at, updated_at
            "#,
        )
        .bind(post.user_id)
        .bind(post.title)
        .bind(post.body)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_post(&self, id: i64, post: NewPost) -> Result<Post, StoreError> {
        let updated = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts SET user_id = $1, title = $2, body = $3, updated_at = CURRENT_TIMESTAMP
            WHERE id = $4
            RETURNING id, user_id, title, body, created_at, updated_at
            "#,
        )
        .bind(post.user_id)
        .bind(post.title)
        .bind(post.body)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_post(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
