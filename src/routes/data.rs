//! `/data` echo endpoint.
//!
//! Accepts any JSON document and returns it unmodified inside a result
//! envelope with `201 Created`. No transformation or persistence happens here.

use axum::{extract::rejection::JsonRejection, http::StatusCode, Extension, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::config::DATA_PROCESSED_MESSAGE;
use crate::error::{AppErrorResponse, ResultExt};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub result: &'static str,
    pub input: Value,
}

/// Echo handler.
///
/// Body rejections (wrong content type, malformed JSON, oversized body) are
/// turned into the JSON error envelope instead of axum's plain-text default.
#[instrument(name = "data::process", skip_all)]
pub async fn process(
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse>), AppErrorResponse> {
    let Json(input) = payload.with_request_id(&request_id)?;

    tracing::debug!(kind = json_kind(&input), "Echoing payload");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            result: DATA_PROCESSED_MESSAGE,
            input,
        }),
    ))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
