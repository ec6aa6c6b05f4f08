use axum::extract::State;
use axum::Json;

use crate::models::{ConfigResponse, HealthResponse};
use crate::AppState;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
    })
}

/// Hands the bearer token to a browser frontend. Only mounted when the
/// server was started with `--expose-config`.
pub async fn config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        bearer_token: state.token.as_str().to_string(),
    })
}
