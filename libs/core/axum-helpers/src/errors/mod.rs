pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use crate::response::ApiResponse;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

/// Application error type that renders as an error envelope.
///
/// Status mapping:
/// - malformed or invalid input and business-rule rejections: 400
/// - authentication failures: 401
/// - request deadline exceeded: 408
/// - storage and internal failures: 500 (503 when the pool is exhausted)
///
/// The envelope's `code` comes from [`ErrorCode`]; validation failures put
/// the per-field errors into `data`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Request understood but refused by a business rule
    #[error("{code}: {message}")]
    Rejected { code: ErrorCode, message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { code: ErrorCode, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn rejected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: ErrorCode::Unauthorized,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(e) => e.status(),
            AppError::ValidationError(_) | AppError::Rejected { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Database(DbErr::ConnectionAcquire(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, data) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (ErrorCode::JsonExtraction, e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    ErrorCode::ValidationError,
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(validation_details(&e)),
                )
            }
            AppError::Database(e) => {
                let code = map_db_error(&e);
                (code, code.default_message().to_string(), None)
            }
            AppError::Rejected { code, message } => {
                tracing::info!(error_code = code.code(), "Rejected: {}", message);
                (code, message, None)
            }
            AppError::Unauthorized { code, message } => {
                tracing::info!(error_code = code.code(), "Unauthorized: {}", message);
                (code, message, None)
            }
            AppError::Timeout => {
                tracing::warn!(error_code = ErrorCode::RequestTimeout.code(), "Request timed out");
                (
                    ErrorCode::RequestTimeout,
                    ErrorCode::RequestTimeout.default_message().to_string(),
                    None,
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                // Internal details stay in the log
                (
                    ErrorCode::InternalError,
                    ErrorCode::InternalError.default_message().to_string(),
                    None,
                )
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (ErrorCode::ServiceUnavailable, msg, None)
            }
        };

        let body = ApiResponse {
            code: code.code(),
            data,
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// Field name -> list of `{code, message, params}` objects.
fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let details = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<serde_json::Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::Value::Array(messages))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(details)
}

/// Log a SeaORM error at a severity matching its cause and pick its code.
fn map_db_error(error: &DbErr) -> ErrorCode {
    match error {
        DbErr::ConnectionAcquire(e) => {
            tracing::warn!(
                error_code = ErrorCode::DatabasePoolTimeout.code(),
                "Database connection pool exhausted: {:?}",
                e
            );
            ErrorCode::DatabasePoolTimeout
        }
        DbErr::Conn(_) | DbErr::Exec(_) | DbErr::Query(_) => {
            tracing::error!(
                error_code = ErrorCode::DatabaseError.code(),
                "Database error: {:?}",
                error
            );
            ErrorCode::DatabaseError
        }
        DbErr::Migration(e) => {
            tracing::error!(
                error_code = ErrorCode::MigrationError.code(),
                "Database migration error: {}",
                e
            );
            ErrorCode::MigrationError
        }
        _ => {
            tracing::error!(
                error_code = ErrorCode::DatabaseUnhandled.code(),
                "Unhandled database error: {:?}",
                error
            );
            ErrorCode::DatabaseUnhandled
        }
    }
}

/// Build an error envelope response directly.
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
/// use axum::http::StatusCode;
///
/// let response = error_response(StatusCode::NOT_FOUND, ErrorCode::NotFound, "no such route");
/// ```
pub fn error_response(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::error(code.code(), message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use validator::Validate;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[derive(Validate)]
    struct Signup {
        #[validate(email)]
        email: String,
    }

    #[tokio::test]
    async fn test_rejected_is_bad_request_with_code() {
        let response = AppError::rejected(ErrorCode::Conflict, "email taken").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], 1008);
        assert_eq!(body["message"], "email taken");
        assert_eq!(body["data"], Value::Null);
    }

    #[tokio::test]
    async fn test_unauthorized_status() {
        let response = AppError::unauthorized("missing token").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], 1006);
    }

    #[tokio::test]
    async fn test_validation_error_carries_field_details() {
        let errors = Signup {
            email: "not-an-email".into(),
        }
        .validate()
        .unwrap_err();

        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], 1001);
        assert_eq!(body["data"]["email"][0]["code"], "email");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = AppError::InternalServerError("argon2 exploded".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["code"], 1005);
        assert!(!body["message"].as_str().unwrap().contains("argon2"));
    }

    #[tokio::test]
    async fn test_database_error_is_500() {
        let response = AppError::from(DbErr::Custom("boom".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["code"], 2099);
    }

    #[tokio::test]
    async fn test_timeout_is_408() {
        let response = AppError::Timeout.into_response();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body_json(response).await["code"], 1015);
    }
}
