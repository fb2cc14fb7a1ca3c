//! Uniform `{code, data, message}` response envelope.
//!
//! Every API response, success or failure, has the same shape:
//!
//! ```json
//! { "code": 0, "data": { "access_token": "..." }, "message": "ok" }
//! { "code": 1008, "data": null, "message": "email already registered" }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `code` value of a successful response.
pub const SUCCESS_CODE: i32 = 0;

pub const SUCCESS_MESSAGE: &str = "ok";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// 0 on success, an `ErrorCode` value otherwise
    pub code: i32,
    pub data: Option<T>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            data: Some(data),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

impl ApiResponse<()> {
    /// Success without a payload (`"data": null`).
    pub fn empty() -> Self {
        Self {
            code: SUCCESS_CODE,
            data: None,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            data: None,
            message: message.into(),
        }
    }
}

/// Documentation schema for envelopes whose `data` is always null.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusEnvelope {
    pub code: i32,
    pub message: String,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
