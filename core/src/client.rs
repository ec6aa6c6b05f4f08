//! Generic JSON-over-HTTP client with bearer authentication.
//!
//! # Design
//! `ApiClient` holds only configuration (base URL, token, timeout) plus a
//! pooled `reqwest::Client`, and carries no mutable state between calls.
//! Each call runs the same pipeline:
//!
//! 1. `build_request` marshals the body and attaches the headers (pure).
//! 2. `execute` performs the round-trip under the timeout, racing the
//!    caller's cancellation future, and reads the whole body.
//! 3. `parse_response` classifies the status and decodes the body (pure).
//!
//! Dropping the in-flight future on timeout or cancellation releases the
//! connection; nothing outlives the call.

use std::future::{self, Future};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    bearer_token: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, bearer_token: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.to_string(),
            timeout,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Describe a request to `endpoint` (appended to the base URL verbatim).
    pub fn build_request<B>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<HttpRequest, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(ClientError::Marshal)?;
        Ok(HttpRequest {
            method,
            url: format!("{}{endpoint}", self.base_url),
            headers: vec![
                ("authorization".to_string(), format!("Bearer {}", self.bearer_token)),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body,
        })
    }

    /// Send `request` and read the full response.
    ///
    /// Fails with `Timeout` once the client's timeout elapses and with
    /// `Cancelled` as soon as `cancel` completes, whichever comes first.
    pub async fn execute<C>(&self, request: HttpRequest, cancel: C) -> Result<HttpResponse, ClientError>
    where
        C: Future<Output = ()>,
    {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let mut builder = self.http.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let round_trip = async {
            let response = builder.send().await.map_err(ClientError::Transport)?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response.text().await.map_err(ClientError::Transport)?;
            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        };

        tokio::select! {
            result = tokio::time::timeout(self.timeout, round_trip) => {
                result.unwrap_or(Err(ClientError::Timeout(self.timeout)))
            }
            () = cancel => Err(ClientError::Cancelled),
        }
    }

    /// Classify `response` and decode its body.
    ///
    /// Returns `Ok(None)` for a successful response with an empty body.
    pub fn parse_response<T>(&self, response: HttpResponse) -> Result<Option<T>, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.check_response(response)?;
        if response.body.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(ClientError::Unmarshal)
    }

    /// Classify `response` without decoding anything.
    ///
    /// Used where the caller has no destination for the body.
    pub fn check_response(&self, response: HttpResponse) -> Result<HttpResponse, ClientError> {
        if !response.is_success() {
            tracing::debug!(status = response.status, "non-success response");
            return Err(ClientError::Status {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    /// Full pipeline, abandoned when `cancel` completes.
    pub async fn request_until<B, T, C>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&B>,
        cancel: C,
    ) -> Result<Option<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
        C: Future<Output = ()>,
    {
        let request = self.build_request(method, endpoint, body)?;
        let response = self.execute(request, cancel).await?;
        self.parse_response(response)
    }

    /// Full pipeline bounded only by the client's timeout.
    pub async fn request<B, T>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Option<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request_until(method, endpoint, body, future::pending())
            .await
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Option<T>, ClientError> {
        self.request::<(), T>(HttpMethod::Get, endpoint, None).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<Option<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(HttpMethod::Post, endpoint, Some(body)).await
    }

    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> Result<Option<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(HttpMethod::Put, endpoint, Some(body)).await
    }

    pub async fn patch<B, T>(&self, endpoint: &str, body: &B) -> Result<Option<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(HttpMethod::Patch, endpoint, Some(body)).await
    }

    /// Delete `endpoint`, discarding whatever body the server returns.
    pub async fn delete(&self, endpoint: &str) -> Result<(), ClientError> {
        let request = self.build_request::<()>(HttpMethod::Delete, endpoint, None)?;
        let response = self.execute(request, future::pending()).await?;
        self.check_response(response).map(|_| ())
    }
}
