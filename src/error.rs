//! Handler error types and their JSON rendering.
//!
//! `AppError` describes what went wrong; `AppErrorResponse` pairs it with the
//! request id so the envelope returned to the client can be matched against
//! the request's log span.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::middleware::RequestId;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request body could not be accepted (wrong content type, bad JSON, too large)
    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("No route for {0}")]
    NotFound(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidBody { status, .. } => *status,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// An `AppError` tagged with the id of the request that produced it.
#[derive(Debug)]
pub struct AppErrorResponse {
    pub error: AppError,
    pub request_id: Option<RequestId>,
}

impl From<AppError> for AppErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error,
            request_id: None,
        }
    }
}

impl IntoResponse for AppErrorResponse {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            tracing::error!(error = ?self.error, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.error, "Request rejected");
        }

        let body = ErrorBody {
            error: self.error.to_string(),
            request_id: self.request_id.map(|id| id.0.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        AppErrorResponse::from(self).into_response()
    }
}

/// Attach a request id to the error side of a `Result`.
pub trait ResultExt<T> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse>;
}

impl<T, E: Into<AppError>> ResultExt<T> for Result<T, E> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse> {
        self.map_err(|e| AppErrorResponse {
            error: e.into(),
            request_id: Some(request_id.clone()),
        })
    }
}
