//! API route handlers
//!
//! - `health`: liveness and readiness probes
//! - `submit`: the lead-submission endpoint and the public form bootstrap

pub mod health;
pub mod submit;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::{ServerError, ServerResult};

/// Service version and base info (GET /, no authentication).
pub async fn service_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Leadgate Server",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/api/v1/submit",
            "/api/v1/form-config",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 Not Found handler for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
