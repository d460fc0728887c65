//! HTTP route handlers.
//!
//! Two endpoints are exposed: a liveness check at `/health` and the `/data`
//! echo endpoint. Anything else falls through to a JSON 404.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod data;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{HeaderValue, CACHE_CONTROL},
        Uri,
    },
    middleware,
    routing::{get, post},
    Extension, Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::error::{AppError, AppErrorResponse};
use crate::middleware::{request_id_layer, RequestId};
use crate::state::AppState;

/// Creates the Axum router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Health check - no caching, always fresh for liveness checks
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    // Echo endpoint - body size capped by config
    let data_routes = Router::new()
        .route("/data", post(data::process))
        .layer(DefaultBodyLimit::max(state.config.http.max_body_bytes));

    Router::new()
        .merge(health_routes)
        .merge(data_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

/// Fallback for paths with no route.
async fn not_found(Extension(request_id): Extension<RequestId>, uri: Uri) -> AppErrorResponse {
    AppErrorResponse {
        error: AppError::NotFound(uri.path().to_string()),
        request_id: Some(request_id),
    }
}
