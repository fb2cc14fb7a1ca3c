//! Users Domain
//!
//! Account registration, login and profile management.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, envelope responses
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Uniqueness check, password hashing, token issuance
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access, optionally inside a unit of work
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Entity    │  ← SeaORM model of the users table
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use database::TransactionManager;
//! use domain_users::{SeaOrmUserRepository, UserService, handlers};
//!
//! let repository = SeaOrmUserRepository::new(db.clone());
//! let service = UserService::new(repository, TransactionManager::new(db), signer.clone());
//!
//! let router = handlers::router(service, signer);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod id;
pub mod models;
pub mod repository;
pub mod service;
pub mod store;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use id::{IdGenerator, UuidV7Generator};
pub use models::{
    LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, UpdateProfileRequest, User,
};
pub use repository::UserRepository;
pub use service::UserService;
pub use store::SeaOrmUserRepository;
