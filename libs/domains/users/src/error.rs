use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    /// No live row for the public user id
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User with email '{0}' already exists")]
    AlreadyExists(String),

    /// Login lookup found no account (or the lookup itself failed)
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Registration could not check email uniqueness
    #[error("Database error when querying")]
    DatabaseQuery,

    #[error("Storage error: {0}")]
    Storage(#[from] DbErr),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => {
                AppError::rejected(ErrorCode::NotFound, "User not found")
            }
            UserError::AlreadyExists(_) => {
                AppError::rejected(ErrorCode::Conflict, "Email already registered")
            }
            UserError::DatabaseQuery => AppError::rejected(
                ErrorCode::DatabaseError,
                "Database error when querying",
            ),
            UserError::Validation(msg) => AppError::rejected(ErrorCode::ValidationError, msg),
            UserError::UserNotFound => AppError::Unauthorized {
                code: ErrorCode::NotFound,
                message: "User not found".to_string(),
            },
            UserError::InvalidCredentials => AppError::Unauthorized {
                code: ErrorCode::InvalidCredentials,
                message: ErrorCode::InvalidCredentials.default_message().to_string(),
            },
            UserError::Unauthorized => AppError::unauthorized("Unauthorized"),
            UserError::Storage(e) => AppError::Database(e),
            UserError::PasswordHash(msg) | UserError::Token(msg) | UserError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
