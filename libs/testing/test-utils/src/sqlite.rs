//! SQLite test infrastructure
//!
//! [`TestDatabase::new`] gives a private, migrated SQLite database living in a
//! single pooled connection, so tests run in parallel without a server.
//! [`TestDatabase::on_disk`] backs the database with a temporary file so a
//! pool of several connections sees the same data.

use database::sql::{self, DatabaseConfig, TransactionManager};
use migration::Migrator;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// Migrated test database, dropped with the struct.
pub struct TestDatabase {
    pub connection: DatabaseConnection,
    // Removed on drop, after the pool
    _dir: Option<TempDir>,
}

impl TestDatabase {
    /// Create a new test database with migrations applied
    ///
    /// # Example
    ///
    /// ```no_run
    /// use test_utils::TestDatabase;
    ///
    /// # async fn example() {
    /// let db = TestDatabase::new().await;
    /// let conn = db.connection();
    /// # }
    /// ```
    pub async fn new() -> Self {
        // One connection: every new sqlite::memory: connection is a distinct database
        let config = DatabaseConfig::new("sqlite::memory:")
            .expect("sqlite URL is valid")
            .with_pool_size(1, 1);

        Self::open(config, None).await
    }

    /// File-backed database with `pool_size` connections.
    ///
    /// Use it when a test needs a second connection while a unit of work
    /// holds the first.
    pub async fn on_disk(pool_size: u32) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("trove.db").display());
        let config = DatabaseConfig::new(&url)
            .expect("sqlite URL is valid")
            .with_pool_size(pool_size, pool_size);

        Self::open(config, Some(dir)).await
    }

    async fn open(config: DatabaseConfig, dir: Option<TempDir>) -> Self {
        let connection = sql::connect(config)
            .await
            .expect("Failed to open SQLite test database");

        sql::run_migrations::<Migrator>(&connection, "test-utils")
            .await
            .expect("Failed to run migrations");

        tracing::debug!(on_disk = dir.is_some(), "Test database ready (SQLite)");

        Self {
            connection,
            _dir: dir,
        }
    }

    pub fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// A transaction manager over this database.
    pub fn transactions(&self) -> TransactionManager {
        TransactionManager::new(self.connection())
    }
}
