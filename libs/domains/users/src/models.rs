use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// User entity - matches SQL schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Storage row key, assigned on insert
    #[serde(skip_serializing)]
    pub id: i32,
    /// Public identifier, immutable once stored
    pub user_id: String,
    pub nickname: String,
    /// Argon2 PHC string (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; rows with a value are invisible to the repository
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// A not-yet-persisted user; `password` must already be hashed.
    pub fn new(user_id: String, email: String, password: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id,
            nickname: String::new(),
            password,
            email,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// DTO for user registration
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email, length(max = 255))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// DTO for user login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email, length(max = 255))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Issued on successful login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Public projection of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user_id: String,
    pub nickname: String,
    pub email: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            nickname: user.nickname,
            email: user.email,
        }
    }
}

/// DTO for profile updates; both fields overwrite the stored values
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub nickname: String,
}
