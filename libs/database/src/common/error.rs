/// Error type for connection management, health probes and migrations.
///
/// Per-query failures stay as `sea_orm::DbErr` so domain crates can map them
/// into their own taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("ORM error: {0}")]
    Orm(#[from] sea_orm::DbErr),

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
