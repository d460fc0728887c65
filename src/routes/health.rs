//! Health check endpoint for container orchestration.
//!
//! Provides a simple liveness check that returns 200 OK when the process is running.
//! Used by Kubernetes, ECS, systemd, and load balancers to verify the service is alive.

use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::config::HEALTH_STATUS;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check handler.
///
/// This is a liveness check - it only checks that the process can respond to HTTP.
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    tracing::debug!("Health check requested");
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: HEALTH_STATUS,
        }),
    )
}
