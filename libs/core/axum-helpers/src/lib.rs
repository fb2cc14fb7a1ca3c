//! # Axum Helpers
//!
//! Utilities, middleware and helpers shared by the HTTP services.
//!
//! ## Modules
//!
//! - **[`auth`]**: JWT issuance/verification and the bearer-token middleware
//! - **[`server`]**: Router assembly, health checks, graceful shutdown
//! - **[`http`]**: Security headers and timeout envelope middleware
//! - **[`errors`]**: `AppError` and numeric error codes
//! - **[`response`]**: The `{code, data, message}` envelope
//! - **[`extractors`]**: Validated JSON extractor

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod response;
pub mod server;

// Re-export auth types
pub use auth::{
    AuthUser, JwtAuth, JwtClaims, JwtConfig, SharedTokenSigner, TokenSigner, jwt_auth_middleware,
};

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, close_database, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

// Re-export error and response types
pub use errors::{AppError, ErrorCode};
pub use response::{ApiResponse, StatusEnvelope};

// Re-export extractors
pub use extractors::ValidatedJson;
