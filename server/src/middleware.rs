//! CORS and bearer-token middleware.
//!
//! `cors` wraps the whole router: it answers every `OPTIONS` preflight with an
//! empty 200 and stamps the CORS headers on every other response, including
//! auth rejections. `require_bearer` wraps each authenticated route and either
//! forwards the request untouched or short-circuits with a 401.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    AUTHORIZATION,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};

use crate::error::ApiError;

const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Authorization, Content-Type";

pub const MISSING_HEADER: &str = "Missing Authorization header";
pub const BAD_FORMAT: &str = "Invalid Authorization format. Use: Bearer <token>";
pub const INVALID_TOKEN: &str = "Invalid token";

pub async fn cors(req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };
    set_cors_headers(response.headers_mut());
    response
}

fn set_cors_headers(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
}

/// The single token accepted by authenticated routes.
///
/// Only a SHA-256 digest is kept for comparison, so presented tokens of any
/// length are checked in constant time against a fixed-size value.
#[derive(Clone)]
pub struct BearerToken {
    raw: Arc<str>,
    digest: [u8; 32],
}

impl BearerToken {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        let raw = token.into();
        let digest = sha256(&raw);
        Self { raw, digest }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, presented: &str) -> bool {
        constant_time_eq(&self.digest, &sha256(presented))
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

fn sha256(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(value.as_bytes()));
    out
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

pub async fn require_bearer(
    State(token): State<BearerToken>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(reason) = check_authorization(req.headers(), &token) {
        tracing::warn!(
            method = %req.method(),
            path = %req.uri().path(),
            reason,
            "rejected unauthenticated request"
        );
        return Err(ApiError::Unauthorized(reason));
    }
    Ok(next.run(req).await)
}

fn check_authorization(headers: &HeaderMap, token: &BearerToken) -> Result<(), &'static str> {
    let header = match headers.get(AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(MISSING_HEADER),
    };
    let presented = header
        .as_bytes()
        .strip_prefix(b"Bearer ")
        .ok_or(BAD_FORMAT)?;
    // Bytes that are not UTF-8 cannot match the configured token.
    let presented = std::str::from_utf8(presented).map_err(|_| INVALID_TOKEN)?;
    if !token.matches(presented) {
        return Err(INVALID_TOKEN);
    }
    Ok(())
}
