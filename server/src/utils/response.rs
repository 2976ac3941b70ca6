//! JSON envelopes shared by every endpoint.
//!
//! Success: `{ "success": true, "data": ..., "message": "..." }`
//! Failure: `{ "success": false, "error": { "code", "message", "details" } }`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorBody,
}

fn reply<T: Serialize>(status: StatusCode, data: Option<T>, message: impl Into<String>) -> Response {
    let body = ApiResponse {
        success: true,
        data,
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

pub fn success<T: Serialize>(data: T, message: impl Into<String>) -> Response {
    reply(StatusCode::OK, Some(data), message)
}

/// 201 with the newly created record.
pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> Response {
    reply(StatusCode::CREATED, Some(data), message)
}

pub fn empty_success(message: impl Into<String>) -> Response {
    reply::<()>(StatusCode::OK, None, message)
}

pub fn error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    details: Option<Value>,
) -> Response {
    let body = ApiErrorResponse {
        success: false,
        error: ApiErrorBody {
            code,
            message: message.into(),
            details,
        },
    };
    (status, Json(body)).into_response()
}
