//! Async API client for the users and posts service.
//!
//! # Overview
//! `ApiClient` sends JSON requests with a bearer token to a fixed base URL and
//! decodes JSON responses. It works against this workspace's server and
//! against third-party mock APIs with the same resource shapes.
//!
//! # Design
//! - `ApiClient` is immutable: base URL, token, timeout and a pooled
//!   `reqwest::Client`.
//! - Each call is split into `build_request` (pure), `execute` (I/O, bounded
//!   by the timeout and an optional cancellation future) and
//!   `parse_response` (pure), so the I/O boundary is explicit.
//! - DTOs are defined independently from the server crate; integration tests
//!   catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{ApiClient, DEFAULT_TIMEOUT};
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CreatePost, CreateUser, PatchUser, Post, SuccessResponse, UpdateUser, User};
