//! Startup configuration.
//!
//! Values come from CLI flags, then the environment, then a `.env` file in the
//! working directory (loaded by `main` before parsing). A missing bearer token
//! is a startup error.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use sqlx::postgres::PgConnectOptions;

use crate::store::PoolSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "rest-server", about = "Users and posts REST API")]
pub struct ServerConfig {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Token every authenticated request must present as `Bearer <token>`.
    #[arg(long, env = "BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: String,

    #[arg(long, env = "STORE", value_enum, default_value = "postgres")]
    pub store: StoreKind,

    /// Serve the bearer token at `GET /config` for a browser frontend.
    #[arg(long, env = "EXPOSE_CONFIG", default_value_t = false)]
    pub expose_config: bool,

    #[command(flatten)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, clap::Args)]
pub struct DatabaseConfig {
    #[arg(id = "db_host", long = "db-host", env = "DB_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(id = "db_port", long = "db-port", env = "DB_PORT", default_value_t = 5432)]
    pub port: u16,

    #[arg(long = "db-user", env = "DB_USER", default_value = "apiuser")]
    pub user: String,

    #[arg(
        long = "db-password",
        env = "DB_PASSWORD",
        default_value = "apipassword",
        hide_env_values = true
    )]
    pub password: String,

    #[arg(long = "db-name", env = "DB_NAME", default_value = "restapi")]
    pub name: String,

    #[arg(long = "db-max-connections", env = "DB_MAX_CONNECTIONS", default_value_t = 25)]
    pub max_connections: u32,

    #[arg(long = "db-min-connections", env = "DB_MIN_CONNECTIONS", default_value_t = 5)]
    pub min_connections: u32,

    #[arg(long = "db-max-lifetime-secs", env = "DB_MAX_LIFETIME_SECS", default_value_t = 300)]
    pub max_lifetime_secs: u64,

    #[arg(long = "db-connect-attempts", env = "DB_CONNECT_ATTEMPTS", default_value_t = 5)]
    pub connect_attempts: u32,

    #[arg(long = "db-retry-delay-secs", env = "DB_RETRY_DELAY_SECS", default_value_t = 2)]
    pub retry_delay_secs: u64,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            max_lifetime: Duration::from_secs(self.max_lifetime_secs),
            connect_attempts: self.connect_attempts,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}
