//! Users and posts REST API.
//!
//! # Overview
//! An axum router exposing CRUD endpoints for `User` and `Post`, guarded by a
//! single static bearer token, with permissive CORS. Persistence is behind the
//! `Store` trait so the same router serves PostgreSQL or an in-memory map.
//!
//! # Design
//! - `AppState` carries the injected store and the token; nothing is global.
//! - `cors` wraps the whole router; `require_bearer` wraps each authenticated
//!   route including its method fallback, so credentials are checked before
//!   method dispatch.
//! - `{id}` captures are typed; a non-numeric id is a 400, never a silent 0.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod store;
pub mod telemetry;

use std::sync::Arc;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use tokio::net::TcpListener;

use handlers::{health, method_not_allowed, posts, route_not_found, users};
pub use error::{ApiError, StoreError};
pub use middleware::BearerToken;
pub use models::{Post, User};
pub use store::{MemoryStore, PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub token: BearerToken,
    pub expose_config: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, token: BearerToken) -> Self {
        Self {
            store,
            token,
            expose_config: false,
        }
    }

    pub fn with_expose_config(mut self, expose: bool) -> Self {
        self.expose_config = expose;
        self
    }
}

pub fn app(state: AppState) -> Router {
    let token = state.token.clone();
    let guarded = |route: MethodRouter<AppState>| {
        route
            .fallback(method_not_allowed)
            .layer(from_fn_with_state(token.clone(), middleware::require_bearer))
    };

    let mut router = Router::new()
        .route("/health", get(health::health).fallback(method_not_allowed))
        .route("/users", guarded(post(users::create_user)))
        .route(
            "/users/{id}",
            guarded(
                get(users::get_user)
                    .put(users::update_user)
                    .patch(users::patch_user)
                    .delete(users::delete_user),
            ),
        )
        .route("/posts", guarded(post(posts::create_post)))
        .route(
            "/posts/{id}",
            guarded(
                get(posts::get_post)
                    .put(posts::update_post)
                    .delete(posts::delete_post),
            ),
        );

    if state.expose_config {
        router = router.route("/config", get(health::config).fallback(method_not_allowed));
    }

    router
        .fallback(route_not_found)
        .with_state(state)
        .layer(from_fn(middleware::cors))
}

/// Serve `app(state)` until `shutdown` resolves.
pub async fn run(
    listener: TcpListener,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Routes as logged at startup.
pub const ROUTES: &[(&str, &str, bool)] = &[
    ("GET", "/health", false),
    ("GET", "/users/{id}", true),
    ("POST", "/users", true),
    ("PUT", "/users/{id}", true),
    ("PATCH", "/users/{id}", true),
    ("DELETE", "/users/{id}", true),
    ("GET", "/posts/{id}", true),
    ("POST", "/posts", true),
    ("PUT", "/posts/{id}", true),
    ("DELETE", "/posts/{id}", true),
];
