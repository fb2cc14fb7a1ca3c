//! Application state management.
//!
//! Shared by every router; cloning is cheap (the pool and the signer are
//! reference counted).

use axum_helpers::SharedTokenSigner;
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// Pooled database connection
    pub db: DatabaseConnection,
    /// Issues and verifies access tokens
    pub signer: SharedTokenSigner,
}

impl AppState {
    pub fn new(config: crate::config::Config, db: DatabaseConnection, signer: SharedTokenSigner) -> Self {
        Self { config, db, signer }
    }
}
