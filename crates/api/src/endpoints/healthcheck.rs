//! Health check endpoint.

use axum::{Router, routing::get};
use serde::Serialize;
use videotube_common::AppResult;

use crate::{middleware::AppState, response::ApiResponse};

/// Health check payload.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Report that the process is serving requests.
async fn healthcheck() -> AppResult<ApiResponse<HealthStatus>> {
    Ok(ApiResponse::ok(
        HealthStatus { status: "OK" },
        "Health check passed",
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(healthcheck))
}
