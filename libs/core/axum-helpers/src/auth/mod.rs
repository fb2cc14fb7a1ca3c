//! Authentication module.
//!
//! - [`JwtConfig`]: signing secret and token lifetime
//! - [`TokenSigner`] / [`JwtAuth`]: token issuance and verification
//! - [`jwt_auth_middleware`] / [`AuthUser`]: protect routes and read the caller
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, SharedTokenSigner, jwt_auth_middleware};
//! use core_config::FromEnv;
//! use std::sync::Arc;
//!
//! let config = JwtConfig::from_env()?;
//! let signer: SharedTokenSigner = Arc::new(JwtAuth::new(&config));
//!
//! let protected = Router::new()
//!     .route("/user", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(signer, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{JwtAuth, JwtClaims, SharedTokenSigner, TokenSigner};
pub use middleware::{AuthUser, jwt_auth_middleware};
